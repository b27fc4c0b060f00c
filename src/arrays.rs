//! Array construction and reshaping helpers.
use crate::type_system::predicates::{one_of, ANYTHING, ITERABLE, NOTHING, NUMERIC};
use crate::type_system::{typecheck, Args, Contract, NativeFn, TypeTag, TypecheckError, Typechecked};
use crate::value::{NdArray, OperationError, Value};
use std::fmt;
use std::sync::OnceLock;
use tracing::trace;

fn expect_array(value: &Value) -> Result<&NdArray, OperationError> {
    value.as_array().ok_or(OperationError::WrongType { expected: "ndarray", actual: value.type_name() })
}

fn into_array(value: Value) -> Result<NdArray, TypecheckError> {
    match value {
        Value::Array(a) => Ok(a),
        other => Err(OperationError::WrongType { expected: "ndarray", actual: other.type_name() }.into()),
    }
}

/// Reads a shape tuple such as `(2, -1)`.
fn shape_of(value: &Value) -> Result<Vec<isize>, OperationError> {
    let Value::Tuple(dims) = value else {
        return Err(OperationError::WrongType { expected: "tuple", actual: value.type_name() });
    };
    dims.iter()
        .map(|dim| match dim {
            Value::Int(d) => isize::try_from(*d).map_err(|_| OperationError::Overflow { op: "reshape" }),
            other => Err(OperationError::WrongType { expected: "int", actual: other.type_name() }),
        })
        .collect()
}

fn dict_to_array(args: &[Value]) -> Result<Value, TypecheckError> {
    let data = args[0]
        .as_map()
        .ok_or(OperationError::WrongType { expected: "dict", actual: args[0].type_name() })?;

    let keys = match args[1].items() {
        Some(keys) if !keys.is_empty() => keys,
        _ => data.keys().cloned().map(Value::Str).collect(),
    };

    let slots = keys
        .iter()
        .map(|key| {
            let value = key.as_str().and_then(|k| data.get(k)).unwrap_or(&args[2]);
            value.as_f64().ok_or(OperationError::NotNumeric { type_name: value.type_name() })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(Value::Array(NdArray::vector(slots)))
}

/// Builds a 1-D array holding `data[key]` for each of `keys`, in order.
///
/// When `keys` is `None` or empty the mapping's own keys are used. Keys that
/// are absent from `data` take `default`, which is `0.0` when omitted.
pub fn convert_dict_to_array(
    data: impl Into<Value>,
    keys: Option<Value>,
    default: Option<Value>,
) -> Result<NdArray, TypecheckError> {
    static WRAPPED: OnceLock<Typechecked<NativeFn>> = OnceLock::new();
    let wrapped = WRAPPED.get_or_init(|| {
        let contract = Contract::new("convert_dict_to_array")
            .param("data", TypeTag::Dict)
            .param_with_default("keys", one_of([NOTHING, ITERABLE]), Value::None)
            .param_with_default("default", NUMERIC, 0.0)
            .returns(TypeTag::NdArray);
        typecheck(contract, dict_to_array as NativeFn)
    });

    let mut kwargs = Vec::with_capacity(2);
    if let Some(keys) = keys {
        kwargs.push(("keys", keys));
    }
    if let Some(default) = default {
        kwargs.push(("default", default));
    }
    into_array(wrapped.call_with(&[data.into()], &kwargs)?)
}

fn into_matrix(args: &[Value]) -> Result<Value, TypecheckError> {
    let shape = shape_of(&args[1])?;
    Ok(Value::Array(expect_array(&args[0])?.reshape(&shape)?))
}

/// Reshapes `data` to `shape` in row-major order. One dimension may be `-1`.
pub fn reshape_into_matrix(data: impl Into<Value>, shape: &[isize]) -> Result<NdArray, TypecheckError> {
    static WRAPPED: OnceLock<Typechecked<NativeFn>> = OnceLock::new();
    let wrapped = WRAPPED.get_or_init(|| {
        let contract = Contract::new("reshape_into_matrix")
            .param("data", TypeTag::NdArray)
            .param("shape", TypeTag::Tuple)
            .returns(TypeTag::NdArray);
        typecheck(contract, into_matrix as NativeFn)
    });

    let shape = Value::tuple(shape.iter().map(|&d| Value::Int(d as i64)));
    into_array(wrapped.call(&[data.into(), shape])?)
}

fn into_vector(args: &[Value]) -> Result<Value, TypecheckError> {
    Ok(Value::Array(expect_array(&args[0])?.reshape(&[-1])?))
}

/// Flattens `data` into shape `(n,)`.
pub fn reshape_into_vector(data: impl Into<Value>) -> Result<NdArray, TypecheckError> {
    static WRAPPED: OnceLock<Typechecked<NativeFn>> = OnceLock::new();
    let wrapped = WRAPPED.get_or_init(|| {
        let contract = Contract::new("reshape_into_vector")
            .param("data", TypeTag::NdArray)
            .returns(TypeTag::NdArray);
        typecheck(contract, into_vector as NativeFn)
    });
    into_array(wrapped.call(&[data.into()])?)
}

fn reshape_body(args: &[Value]) -> Result<Value, TypecheckError> {
    let shape = shape_of(&args[1])?;
    match &args[0] {
        Value::Array(a) if !shape.is_empty() => Ok(Value::Array(a.reshape(&shape)?)),
        other => Ok(other.clone()),
    }
}

/// Reshapes `arg` when it is an array and `shape` is non-empty; any other
/// value is returned unchanged.
pub fn reshape_value(arg: &Value, shape: &[isize]) -> Result<Value, TypecheckError> {
    static WRAPPED: OnceLock<Typechecked<NativeFn>> = OnceLock::new();
    let wrapped = WRAPPED.get_or_init(|| {
        let contract = Contract::new("reshape_value")
            .param("arg", ANYTHING)
            .param("shape", TypeTag::Tuple)
            .returns(ANYTHING);
        typecheck(contract, reshape_body as NativeFn)
    });

    let shape = Value::tuple(shape.iter().map(|&d| Value::Int(d as i64)));
    wrapped.call(&[arg.clone(), shape])
}

/// A function whose array arguments, and optionally its result, are
/// reshaped on every call.
///
/// There is one shape per argument, plus one trailing shape for the result
/// when it should be reshaped too. An empty shape leaves its value alone.
pub struct Reshapes<F> {
    name: String,
    shapes: Vec<Vec<isize>>,
    func: F,
}

/// Wraps `func` so its arguments are reshaped to `shapes` before each call.
pub fn reshapes<F>(name: impl Into<String>, shapes: Vec<Vec<isize>>, func: F) -> Reshapes<F>
where
    F: Fn(&[Value]) -> Result<Value, TypecheckError>,
{
    Reshapes { name: name.into(), shapes, func }
}

impl<F> Reshapes<F>
where
    F: Fn(&[Value]) -> Result<Value, TypecheckError>,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shapes(&self) -> &[Vec<isize>] {
        &self.shapes
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, TypecheckError> {
        let count = args.len();
        if count != self.shapes.len() && count + 1 != self.shapes.len() {
            return Err(TypecheckError::ArgumentCount {
                fname: self.name.clone(),
                expected: self.shapes.len(),
                actual: count,
            });
        }

        let reshaped = args
            .iter()
            .zip(&self.shapes)
            .map(|(arg, shape)| reshape_value(arg, shape))
            .collect::<Result<Args, _>>()?;
        trace!(function = %self.name, count, "arguments reshaped");

        let result = (self.func)(&reshaped)?;
        match self.shapes.get(count) {
            Some(shape) => reshape_value(&result, shape),
            None => Ok(result),
        }
    }
}

impl<F> fmt::Debug for Reshapes<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reshapes")
            .field("name", &self.name)
            .field("shapes", &self.shapes)
            .finish_non_exhaustive()
    }
}
