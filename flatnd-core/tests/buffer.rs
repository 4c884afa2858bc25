use flatnd_core::{AlignedBuffer, BackendDevice, Cpu, Error, ALIGNMENT, ELEM_SIZE, TILE};

#[test]
fn allocation_is_aligned_and_sized() {
    for size in [1, 7, 64, 1000] {
        let buf = AlignedBuffer::new(size).unwrap();
        assert_eq!(buf.len(), size);
        assert_eq!(buf.align(), ALIGNMENT);
        assert_eq!(buf.ptr_as_usize() % ALIGNMENT, 0);
    }
}

#[test]
fn starts_zeroed() {
    let buf = AlignedBuffer::new(33).unwrap();
    assert!(buf.iter().all(|&x| x == 0.0));
}

#[test]
fn zero_sized() {
    let buf = AlignedBuffer::new(0).unwrap();
    assert!(buf.is_empty());
    assert_eq!(buf.to_vec(), Vec::<f32>::new());
}

#[test]
fn custom_alignment() {
    let buf = AlignedBuffer::with_alignment(10, 64).unwrap();
    assert_eq!(buf.align(), 64);
    assert_eq!(buf.ptr_as_usize() % 64, 0);
}

#[test]
fn alignment_below_tile_width_rejected() {
    let err = AlignedBuffer::with_alignment(10, TILE * ELEM_SIZE / 2).unwrap_err();
    assert!(matches!(err, Error::Layout { size: 10, .. }));
}

#[test]
fn non_power_of_two_alignment_rejected() {
    let err = AlignedBuffer::with_alignment(10, 96).unwrap_err();
    assert!(matches!(err, Error::Layout { align: 96, .. }));
}

#[test]
fn overflowing_size_rejected() {
    let err = AlignedBuffer::new(usize::MAX).unwrap_err();
    assert!(matches!(err, Error::Layout { .. }));
}

#[test]
fn fill_sets_every_element() {
    let mut buf = AlignedBuffer::new(17).unwrap();
    buf.fill(2.5);
    assert_eq!(buf.to_vec(), vec![2.5; 17]);
}

#[test]
fn host_round_trip() {
    let data: Vec<f32> = (0..12).map(|x| x as f32 * 0.5).collect();
    let mut buf = AlignedBuffer::new(12).unwrap();
    buf.copy_from_host(&data).unwrap();
    assert_eq!(buf.to_vec(), data);
    assert_eq!(buf[3], 1.5);
    assert_eq!(buf.get(12), None);
}

#[test]
fn host_length_mismatch() {
    let mut buf = AlignedBuffer::new(4).unwrap();
    let err = buf.copy_from_host(&[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 4, got: 2 }));
    assert_eq!(buf.to_vec(), vec![0.0; 4]);
}

#[test]
fn clone_is_deep() {
    let mut a = AlignedBuffer::with_alignment(5, 128).unwrap();
    a.copy_from_host(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    let mut b = a.clone();
    assert_eq!(a, b);
    assert_eq!(b.align(), 128);
    assert_ne!(a.ptr_as_usize(), b.ptr_as_usize());
    b[0] = 10.0;
    assert_eq!(a[0], 1.0);
}

#[test]
fn cpu_device_allocates_and_copies() {
    let cpu = Cpu;
    assert_eq!(Cpu::NAME, "cpu");
    assert_eq!(Cpu::TILE_SIZE, TILE);
    let mut buf = cpu.allocate(6).unwrap();
    cpu.from_host(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &mut buf).unwrap();
    cpu.fill(&mut buf, 0.0);
    assert_eq!(buf.to_vec(), vec![0.0; 6]);
}
