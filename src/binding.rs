// src/binding.rs

//! Dynamically typed call surface for the compositor.
//!
//! Scripting hosts hand native functions a slice of loosely typed values.
//! This module checks such an argument list against the `render` contract
//! (`render(dest, source, x, y, fg, bg=0)`) and dispatches to
//! [`compositor::render`]. Every argument is validated before any pixel is
//! touched, so a rejected call never leaves a half-drawn destination.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

use crate::color::Color;
use crate::compositor;
use crate::surface::{PixelSource, PixelSurface};

/// Shared handle to a surface owned by the host.
pub type SurfaceRef = Rc<RefCell<dyn PixelSurface>>;

/// Signature of a function exported through a [`NativeModule`].
pub type NativeFn = fn(&[Value]) -> Result<Value, BindingError>;

/// A host value passed to or returned from a native function.
#[derive(Clone)]
pub enum Value {
    None,
    Int(i64),
    Str(String),
    Surface(SurfaceRef),
}

impl Value {
    /// Wraps a surface in a fresh shared handle.
    pub fn surface<S: PixelSurface + 'static>(surface: S) -> Self {
        Value::Surface(Rc::new(RefCell::new(surface)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Surface(_) => "surface",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Surface(s) => match s.try_borrow() {
                Ok(s) => write!(f, "Surface({}x{})", s.width(), s.height()),
                Err(_) => write!(f, "Surface(<borrowed>)"),
            },
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// Wrong number of positional arguments.
    ArgumentCount {
        min: usize,
        max: usize,
        given: usize,
    },
    /// An argument is not of the expected kind.
    TypeMismatch {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// A surface argument is already mutably borrowed by the host.
    SurfaceBusy { position: usize },
    /// No function with this name is registered.
    UnknownFunction(String),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::ArgumentCount { min, max, given } => write!(
                f,
                "function takes {} to {} positional arguments but {} were given",
                min, max, given
            ),
            BindingError::TypeMismatch {
                position,
                expected,
                found,
            } => write!(
                f,
                "argument {}: expected {}, found {}",
                position, expected, found
            ),
            BindingError::SurfaceBusy { position } => {
                write!(f, "argument {}: surface is in use", position)
            }
            BindingError::UnknownFunction(name) => write!(f, "no function named '{}'", name),
        }
    }
}

impl std::error::Error for BindingError {}

fn expect_surface(args: &[Value], position: usize) -> Result<&SurfaceRef, BindingError> {
    match &args[position] {
        Value::Surface(surface) => Ok(surface),
        other => Err(BindingError::TypeMismatch {
            position,
            expected: "surface",
            found: other.type_name(),
        }),
    }
}

fn expect_int(args: &[Value], position: usize) -> Result<i64, BindingError> {
    match &args[position] {
        Value::Int(v) => Ok(*v),
        other => Err(BindingError::TypeMismatch {
            position,
            expected: "int",
            found: other.type_name(),
        }),
    }
}

/// Offsets beyond the `i32` range are saturated. Any surface is far smaller
/// than that, so a saturated offset still places the source off the surface.
fn expect_coord(args: &[Value], position: usize) -> Result<i32, BindingError> {
    let value = expect_int(args, position)?;
    Ok(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Colors keep the low 32 bits of the integer, so negative values arrive as
/// their two's complement bit pattern.
fn expect_color(args: &[Value], position: usize) -> Result<Color, BindingError> {
    expect_int(args, position).map(|value| value as Color)
}

/// `render(dest, source, x, y, fg, bg=0)`.
///
/// Returns [`Value::None`] on success. When `dest` and `source` are the same
/// surface the call is routed to [`compositor::render_in_place`].
pub fn call_render(args: &[Value]) -> Result<Value, BindingError> {
    if !(5..=6).contains(&args.len()) {
        return Err(BindingError::ArgumentCount {
            min: 5,
            max: 6,
            given: args.len(),
        });
    }
    let dest = expect_surface(args, 0)?;
    let source = expect_surface(args, 1)?;
    let x = expect_coord(args, 2)?;
    let y = expect_coord(args, 3)?;
    let fg = expect_color(args, 4)?;
    let bg = if args.len() > 5 {
        expect_color(args, 5)?
    } else {
        0
    };

    if Rc::ptr_eq(dest, source) {
        trace!("render in place at ({}, {})", x, y);
        let mut surface = dest
            .try_borrow_mut()
            .map_err(|_| BindingError::SurfaceBusy { position: 0 })?;
        compositor::render_in_place(&mut *surface, x, y, fg, bg);
    } else {
        trace!("render at ({}, {})", x, y);
        let mut dest = dest
            .try_borrow_mut()
            .map_err(|_| BindingError::SurfaceBusy { position: 0 })?;
        let source = source
            .try_borrow()
            .map_err(|_| BindingError::SurfaceBusy { position: 1 })?;
        compositor::render(&mut *dest, &*source, x, y, fg, bg);
    }
    Ok(Value::None)
}

/// A named table of native functions, as exposed to a host namespace.
pub struct NativeModule {
    name: &'static str,
    functions: HashMap<&'static str, NativeFn>,
}

impl NativeModule {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            functions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn register(&mut self, name: &'static str, function: NativeFn) {
        debug!("{}: registering '{}'", self.name, name);
        self.functions.insert(name, function);
    }

    pub fn lookup(&self, name: &str) -> Option<NativeFn> {
        self.functions.get(name).copied()
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, BindingError> {
        let function = self
            .lookup(name)
            .ok_or_else(|| BindingError::UnknownFunction(name.to_string()))?;
        function(args)
    }
}

/// The `framebuf_utils` module with `render` registered.
pub fn framebuf_utils() -> NativeModule {
    let mut module = NativeModule::new("framebuf_utils");
    module.register("render", call_render);
    module
}
