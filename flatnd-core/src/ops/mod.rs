//! Element-wise, scalar and unary operators over compact buffers.
//!
//! Every operation funnels through one of three drivers, [`binary_op`],
//! [`scalar_op`] and [`unary_op`], parameterized by an operator tag. The
//! named functions (`ewise_add`, `scalar_ge`, ...) are one-line wrappers.
//! None of these are layout aware: inputs are compact and pre-sized.

#[cfg(feature = "simd")]
mod simd;

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum BinaryOpType {
    Add,
    Mul,
    Div,
    Power,
    Maximum,
    Eq,
    Ge,
}

impl BinaryOpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Power => "power",
            Self::Maximum => "maximum",
            Self::Eq => "eq",
            Self::Ge => "ge",
        }
    }

    pub fn as_closure(&self) -> fn(f32, f32) -> f32 {
        match self {
            Self::Add => |x, y| x + y,
            Self::Mul => |x, y| x * y,
            Self::Div => |x, y| x / y,
            Self::Power => f32::powf,
            // NaN on the left wins, matching the reduction.
            Self::Maximum => |x, y| if x < y { y } else { x },
            Self::Eq => |x, y| f32::from(x == y),
            Self::Ge => |x, y| f32::from(x >= y),
        }
    }

    #[inline]
    pub fn apply(&self, x: f32, y: f32) -> f32 {
        (self.as_closure())(x, y)
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum UnaryOpType {
    Log,
    Exp,
    Tanh,
}

impl UnaryOpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Exp => "exp",
            Self::Tanh => "tanh",
        }
    }

    pub fn as_closure(&self) -> fn(f32) -> f32 {
        match self {
            Self::Log => f32::ln,
            Self::Exp => f32::exp,
            Self::Tanh => f32::tanh,
        }
    }

    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        (self.as_closure())(x)
    }
}

/// `out[i] = op(a[i], b[i])`.
pub fn binary_op(a: &[f32], b: &[f32], out: &mut [f32], op: BinaryOpType) {
    assert_eq!(a.len(), b.len(), "{} operands differ in size", op.as_str());
    assert_eq!(a.len(), out.len(), "{} output size mismatch", op.as_str());

    #[cfg(feature = "simd")]
    let vectorized = simd::binary_simd_op(a, b, out, op);
    #[cfg(not(feature = "simd"))]
    let vectorized = false;
    if vectorized {
        return;
    }

    let f = op.as_closure();
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = f(x, y);
    }
}

/// `out[i] = op(a[i], val)`.
pub fn scalar_op(a: &[f32], val: f32, out: &mut [f32], op: BinaryOpType) {
    assert_eq!(a.len(), out.len(), "scalar {} output size mismatch", op.as_str());

    #[cfg(feature = "simd")]
    let vectorized = simd::scalar_simd_op(a, val, out, op);
    #[cfg(not(feature = "simd"))]
    let vectorized = false;
    if vectorized {
        return;
    }

    let f = op.as_closure();
    for (o, &x) in out.iter_mut().zip(a) {
        *o = f(x, val);
    }
}

/// `out[i] = op(a[i])`.
pub fn unary_op(a: &[f32], out: &mut [f32], op: UnaryOpType) {
    assert_eq!(a.len(), out.len(), "{} output size mismatch", op.as_str());
    let f = op.as_closure();
    for (o, &x) in out.iter_mut().zip(a) {
        *o = f(x);
    }
}

macro_rules! ewise_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(a: &[f32], b: &[f32], out: &mut [f32]) {
                binary_op(a, b, out, BinaryOpType::$op)
            }
        )*
    };
}

macro_rules! scalar_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(a: &[f32], val: f32, out: &mut [f32]) {
                scalar_op(a, val, out, BinaryOpType::$op)
            }
        )*
    };
}

macro_rules! unary_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(a: &[f32], out: &mut [f32]) {
                unary_op(a, out, UnaryOpType::$op)
            }
        )*
    };
}

ewise_fns!(
    ewise_add => Add,
    ewise_mul => Mul,
    ewise_div => Div,
    ewise_maximum => Maximum,
    ewise_eq => Eq,
    ewise_ge => Ge,
);

scalar_fns!(
    scalar_add => Add,
    scalar_mul => Mul,
    scalar_div => Div,
    scalar_power => Power,
    scalar_maximum => Maximum,
    scalar_eq => Eq,
    scalar_ge => Ge,
);

unary_fns!(
    ewise_log => Log,
    ewise_exp => Exp,
    ewise_tanh => Tanh,
);
