//! Typed application variables.
//!
//! A [`Variable`] couples an immutable name and [`VarKind`] with a current
//! [`VarValue`] and optional numeric [`Limits`]. The value enum is tagged by
//! kind, so a variable can never hold a value of a different kind than the
//! one it was registered with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, VarError};

/// Fixed type tag of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    /// Signed integer (`"INT"` on the wire).
    #[serde(rename = "INT")]
    Integer,
    /// Floating point number (`"FLOAT"` on the wire).
    #[serde(rename = "FLOAT")]
    Float,
    /// UTF-8 text (`"STRING"` on the wire).
    #[serde(rename = "STRING")]
    Text,
}

impl VarKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "INT",
            Self::Float => "FLOAT",
            Self::Text => "STRING",
        }
    }

    /// Returns `true` for kinds that accept [`Limits`].
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current value of a variable.
///
/// Serializes untagged, so `Int(3)` becomes `3`, `Float(2.5)` becomes `2.5`
/// and `Text("a")` becomes `"a"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
    /// Integer payload.
    Int(i64),
    /// Float payload.
    Float(f64),
    /// Text payload.
    Text(String),
}

impl VarValue {
    /// Returns the kind this value naturally belongs to.
    #[must_use]
    pub const fn kind(&self) -> VarKind {
        match self {
            Self::Int(_) => VarKind::Integer,
            Self::Float(_) => VarKind::Float,
            Self::Text(_) => VarKind::Text,
        }
    }

    /// Returns the numeric payload as `f64`, or `None` for text.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Converts a decoded JSON value into a candidate value.
    ///
    /// Integral numbers become [`VarValue::Int`], other numbers become
    /// [`VarValue::Float`] and strings become [`VarValue::Text`]. Booleans,
    /// arrays, objects and `null` have no candidate representation.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Coerces this value into `kind`, following the write rules:
    ///
    /// - `Integer` accepts integers and floats without a fractional part
    ///   that fit in an `i64`.
    /// - `Float` accepts any finite number.
    /// - `Text` accepts only text.
    ///
    /// Returns `None` when the value is not compatible.
    #[must_use]
    pub fn coerce(self, kind: VarKind) -> Option<Self> {
        match (kind, self) {
            (VarKind::Integer, Self::Int(v)) => Some(Self::Int(v)),
            (VarKind::Integer, Self::Float(v)) => {
                // i64::MAX as f64 rounds up to 2^63, hence the strict bound.
                let integral = v.is_finite() && v.fract() == 0.0;
                (integral && v >= i64::MIN as f64 && v < i64::MAX as f64)
                    .then(|| Self::Int(v as i64))
            }
            (VarKind::Float, Self::Int(v)) => Some(Self::Float(v as f64)),
            (VarKind::Float, Self::Float(v)) => v.is_finite().then_some(Self::Float(v)),
            (VarKind::Text, Self::Text(s)) => Some(Self::Text(s)),
            _ => None,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Inclusive numeric bounds checked on every write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl Limits {
    /// Creates a new pair of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidLimits`] if either bound is not
    /// finite or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, RegistryError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(RegistryError::InvalidLimits { min, max });
        }
        Ok(Self { min, max })
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Returns `true` if `value` lies within `[min, max]`, compared
    /// exactly.
    ///
    /// Integers above 2^53 do not survive a cast to `f64`, so the bounds
    /// are rounded inwards to whole numbers and compared as `i128`.
    #[must_use]
    pub fn contains_int(&self, value: i64) -> bool {
        // Float-to-int `as` saturates; finite bounds beyond i128 stay ordered.
        let lo = self.min.ceil() as i128;
        let hi = self.max.floor() as i128;
        (lo..=hi).contains(&i128::from(value))
    }

    /// Returns `true` if a numeric `value` lies within the bounds. Text is
    /// never within bounds.
    #[must_use]
    pub fn admits(&self, value: &VarValue) -> bool {
        match value {
            VarValue::Int(v) => self.contains_int(*v),
            VarValue::Float(v) => self.contains(*v),
            VarValue::Text(_) => false,
        }
    }
}

/// One registered named value.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    kind: VarKind,
    value: VarValue,
    limits: Option<Limits>,
}

impl Variable {
    /// Creates a variable whose kind is taken from `initial`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if limits are attached to a text
    /// variable or the initial value lies outside the limits.
    pub fn new(
        name: impl Into<String>,
        initial: VarValue,
        limits: Option<Limits>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        let kind = initial.kind();
        if let Some(limits) = limits {
            if !kind.is_numeric() {
                return Err(RegistryError::LimitsOnText(name));
            }
            if !limits.admits(&initial) {
                return Err(RegistryError::InitialOutOfRange(name));
            }
        }
        Ok(Self {
            name,
            kind,
            value: initial,
            limits,
        })
    }

    /// Shorthand for an unbounded integer variable.
    #[must_use]
    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Integer,
            value: VarValue::Int(value),
            limits: None,
        }
    }

    /// Shorthand for an unbounded float variable.
    #[must_use]
    pub fn float(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Float,
            value: VarValue::Float(value),
            limits: None,
        }
    }

    /// Shorthand for a text variable.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Text,
            value: VarValue::Text(value.into()),
            limits: None,
        }
    }

    /// Attaches limits to a numeric variable.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Variable::new`].
    pub fn with_limits(self, min: f64, max: f64) -> Result<Self, RegistryError> {
        Self::new(self.name, self.value, Some(Limits::new(min, max)?))
    }

    /// Variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable kind.
    #[must_use]
    pub const fn kind(&self) -> VarKind {
        self.kind
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &VarValue {
        &self.value
    }

    /// Optional limits.
    #[must_use]
    pub const fn limits(&self) -> Option<Limits> {
        self.limits
    }

    /// Validates `candidate` against kind and limits and stores it.
    ///
    /// Nothing is written unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns [`VarError::TypeMismatch`] or [`VarError::OutOfRange`].
    pub(crate) fn assign(&mut self, candidate: VarValue) -> Result<(), VarError> {
        let coerced = candidate
            .coerce(self.kind)
            .ok_or_else(|| VarError::TypeMismatch {
                name: self.name.clone(),
                expected: self.kind,
            })?;
        if let (Some(limits), Some(v)) = (self.limits, coerced.as_f64())
            && !limits.admits(&coerced)
        {
            return Err(VarError::OutOfRange {
                name: self.name.clone(),
                value: v,
                min: limits.min,
                max: limits.max,
            });
        }
        self.value = coerced;
        Ok(())
    }
}

/// Declarative variable definition as found in a definitions file.
///
/// ```json
/// { "name": "gain", "type": "FLOAT", "value": 1.0, "min": 0.0, "max": 10.0 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct VariableDef {
    /// Variable name.
    pub name: String,
    /// Declared kind.
    #[serde(rename = "type")]
    pub kind: VarKind,
    /// Initial value; must be compatible with `kind`.
    pub value: serde_json::Value,
    /// Optional lower bound (requires `max`).
    #[serde(default)]
    pub min: Option<f64>,
    /// Optional upper bound (requires `min`).
    #[serde(default)]
    pub max: Option<f64>,
}

impl TryFrom<VariableDef> for Variable {
    type Error = RegistryError;

    fn try_from(def: VariableDef) -> Result<Self, Self::Error> {
        let initial = VarValue::from_json(&def.value)
            .and_then(|v| v.coerce(def.kind))
            .ok_or_else(|| RegistryError::KindMismatch {
                name: def.name.clone(),
                kind: def.kind,
            })?;
        let limits = match (def.min, def.max) {
            (Some(min), Some(max)) => Some(Limits::new(min, max)?),
            (None, None) => None,
            _ => return Err(RegistryError::HalfOpenLimits(def.name)),
        };
        Self::new(def.name, initial, limits)
    }
}
