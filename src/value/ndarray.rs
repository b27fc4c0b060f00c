//! Dense row-major n-dimensional `f64` arrays.
use super::ops::OperationError;
use super::format_float;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

type Shape = SmallVec<[usize; 4]>;

/// An n-dimensional array stored as a flat row-major buffer.
///
/// The product of `shape` always equals `data.len()`; a 0-dimensional array
/// holds exactly one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArray")]
pub struct NdArray {
    shape: Shape,
    data: Vec<f64>,
}

/// Unvalidated wire form; deserialization goes through [`NdArray::new`].
#[derive(Deserialize)]
struct RawArray {
    shape: Shape,
    data: Vec<f64>,
}

impl TryFrom<RawArray> for NdArray {
    type Error = OperationError;

    fn try_from(raw: RawArray) -> Result<Self, Self::Error> {
        NdArray::new(&raw.shape, raw.data)
    }
}

/// Formats a shape as a tuple literal, e.g. `(3,)` or `(2, 2)`.
pub(crate) fn format_shape<T: fmt::Display>(shape: &[T]) -> String {
    match shape {
        [single] => format!("({},)", single),
        _ => {
            let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
            format!("({})", dims.join(", "))
        }
    }
}

impl NdArray {
    pub fn new(shape: &[usize], data: Vec<f64>) -> Result<Self, OperationError> {
        let Some(expected) = shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d)) else {
            return Err(OperationError::Shape {
                expected: "a shape whose size fits in memory".to_string(),
                actual: format!("shape {}", format_shape(shape)),
            });
        };
        if expected != data.len() {
            return Err(OperationError::Shape {
                expected: format!("{} elements for shape {}", expected, format_shape(shape)),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { shape: SmallVec::from_slice(shape), data })
    }

    /// A 0-dimensional array.
    pub fn scalar(value: f64) -> Self {
        Self { shape: Shape::new(), data: vec![value] }
    }

    /// A 1-dimensional array.
    pub fn vector(data: Vec<f64>) -> Self {
        let mut shape = Shape::new();
        shape.push(data.len());
        Self { shape, data }
    }

    /// Stacks equally sized rows into a 2-dimensional array.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, OperationError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(OperationError::Shape {
                expected: format!("rows of length {}", cols),
                actual: format!("a row of length {}", bad.len()),
            });
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(&[rows.len(), cols], data)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Element at a full multi-index, if in range.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (&i, &dim) in index.iter().zip(self.shape.iter()) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        self.data.get(flat).copied()
    }

    /// Sub-arrays along the first axis. Empty for 0-dimensional arrays.
    pub fn rows(&self) -> Vec<NdArray> {
        let Some((&count, rest)) = self.shape.split_first() else {
            return Vec::new();
        };
        let stride: usize = rest.iter().product();
        (0..count)
            .map(|i| NdArray {
                shape: SmallVec::from_slice(rest),
                data: self.data[i * stride..(i + 1) * stride].to_vec(),
            })
            .collect()
    }

    /// Returns a copy with a new shape. At most one dimension may be `-1`,
    /// in which case it is inferred from the element count.
    pub fn reshape(&self, shape: &[isize]) -> Result<NdArray, OperationError> {
        let mismatch = || OperationError::Shape {
            expected: format!("a shape compatible with size {}", self.size()),
            actual: format!("shape {}", format_shape(shape)),
        };

        let mut wildcard = None;
        let mut known: usize = 1;
        for (axis, &dim) in shape.iter().enumerate() {
            match dim {
                -1 if wildcard.is_none() => wildcard = Some(axis),
                d if d >= 0 => known = known.checked_mul(d as usize).ok_or_else(mismatch)?,
                _ => return Err(mismatch()),
            }
        }

        let mut resolved: Shape = shape.iter().map(|&d| d.max(0) as usize).collect();
        match wildcard {
            Some(axis) => {
                if known == 0 || self.size() % known != 0 {
                    return Err(mismatch());
                }
                resolved[axis] = self.size() / known;
            }
            None if known != self.size() => return Err(mismatch()),
            None => {}
        }

        Ok(NdArray { shape: resolved, data: self.data.clone() })
    }

    fn fmt_axis(&self, f: &mut fmt::Formatter<'_>, axis: usize, offset: usize) -> fmt::Result {
        if axis == self.shape.len() {
            return write!(f, "{}", format_float(self.data[offset]));
        }
        let stride: usize = self.shape[axis + 1..].iter().product();
        write!(f, "[")?;
        for i in 0..self.shape[axis] {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.fmt_axis(f, axis + 1, offset + i * stride)?;
        }
        write!(f, "]")
    }
}

/// Nested-bracket listing of the elements, e.g. `[[1.0, 2.0], [3.0, 4.0]]`.
impl fmt::Display for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_axis(f, 0, 0)
    }
}
