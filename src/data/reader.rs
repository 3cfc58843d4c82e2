//! NetCDF-backed grid.

use super::{Dimension, Grid, Selection, VariableInfo};
use crate::error::{OceanGridError, Result};
use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::{AttributeValue, Extent};
use std::path::{Path, PathBuf};

/// Grid backed by an open netCDF file.
///
/// The file handle lives as long as this value and is closed when it is
/// dropped. Close failures are swallowed by the netCDF binding.
#[derive(Debug)]
pub struct NetcdfGrid {
    path: PathBuf,
    file: netcdf::File,
}

impl NetcdfGrid {
    /// Open a netCDF file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OceanGridError::file_not_found(path));
        }

        let file = netcdf::open(path)
            .map_err(|e| OceanGridError::NetCDF(format!("Failed to open {}: {}", path.display(), e)))?;
        tracing::debug!("Opened netCDF file {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn describe(var: &netcdf::Variable<'_>) -> VariableInfo {
        VariableInfo {
            name: var.name().to_string(),
            dim_names: var
                .dimensions()
                .iter()
                .map(|d: &netcdf::Dimension<'_>| d.name().to_string())
                .collect(),
            shape: var
                .dimensions()
                .iter()
                .map(|d: &netcdf::Dimension<'_>| d.len())
                .collect(),
            dtype: dtype_name(&var.vartype()),
            attributes: var
                .attributes()
                .map(|attr| (attr.name().to_string(), attr_value_to_string(&attr)))
                .collect(),
        }
    }
}

impl Grid for NetcdfGrid {
    fn dimensions(&self) -> Vec<Dimension> {
        self.file
            .dimensions()
            .map(|d| Dimension::new(d.name().to_string(), d.len()))
            .collect()
    }

    fn variables(&self) -> Vec<VariableInfo> {
        self.file.variables().map(|v| Self::describe(&v)).collect()
    }

    fn global_attributes(&self) -> Vec<(String, String)> {
        self.file
            .attributes()
            .map(|attr| (attr.name().to_string(), attr_value_to_string(&attr)))
            .collect()
    }

    fn variable(&self, name: &str) -> Option<VariableInfo> {
        self.file.variable(name).map(|v| Self::describe(&v))
    }

    fn read(&self, name: &str, selection: &[Selection]) -> Result<ArrayD<f64>> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| OceanGridError::variable_not_found(name))?;
        let dims = var.dimensions();

        if selection.len() != dims.len() {
            return Err(OceanGridError::InvalidSlice(format!(
                "'{}' has {} dimensions but {} selections were given",
                name,
                dims.len(),
                selection.len()
            )));
        }

        let mut extents = Vec::with_capacity(dims.len());
        let mut shape = Vec::with_capacity(dims.len());
        for (dim, sel) in dims.iter().zip(selection) {
            sel.check(&dim.name().to_string(), dim.len())?;
            match *sel {
                Selection::All => {
                    extents.push(Extent::from(0..dim.len()));
                    shape.push(dim.len());
                }
                Selection::Index(i) => extents.push(Extent::Index(i)),
            }
        }
        tracing::debug!("Reading '{}' with selection {:?}", name, selection);

        let fill = get_attr_f64(&var, "_FillValue").or_else(|| get_attr_f64(&var, "missing_value"));
        let mut data = read_variable_array(&var, &extents, &shape, fill)?;

        // CF packing
        let scale_factor = get_attr_f64(&var, "scale_factor").unwrap_or(1.0);
        let add_offset = get_attr_f64(&var, "add_offset").unwrap_or(0.0);
        if scale_factor != 1.0 || add_offset != 0.0 {
            data.mapv_inplace(|v| v * scale_factor + add_offset);
        }

        Ok(data)
    }
}

/// Short lowercase name of a netCDF element type.
fn dtype_name(vartype: &NcVariableType) -> String {
    match vartype {
        NcVariableType::Float(FloatType::F32) => "float32".to_string(),
        NcVariableType::Float(FloatType::F64) => "float64".to_string(),
        NcVariableType::Int(IntType::I8) => "int8".to_string(),
        NcVariableType::Int(IntType::I16) => "int16".to_string(),
        NcVariableType::Int(IntType::I32) => "int32".to_string(),
        NcVariableType::Int(IntType::I64) => "int64".to_string(),
        NcVariableType::Int(IntType::U8) => "uint8".to_string(),
        NcVariableType::Int(IntType::U16) => "uint16".to_string(),
        NcVariableType::Int(IntType::U32) => "uint32".to_string(),
        NcVariableType::Int(IntType::U64) => "uint64".to_string(),
        NcVariableType::Char => "char".to_string(),
        NcVariableType::String => "string".to_string(),
        other => format!("{:?}", other).to_lowercase(),
    }
}

fn get_attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            AttributeValue::Double(d) => Some(d),
            AttributeValue::Float(f) => Some(f as f64),
            AttributeValue::Short(s) => Some(s as f64),
            AttributeValue::Int(i) => Some(i as f64),
            AttributeValue::Schar(c) => Some(c as f64),
            AttributeValue::Uchar(c) => Some(c as f64),
            AttributeValue::Ushort(s) => Some(s as f64),
            AttributeValue::Uint(i) => Some(i as f64),
            AttributeValue::Longlong(i) => Some(i as f64),
            AttributeValue::Ulonglong(i) => Some(i as f64),
            _ => None,
        })
}

/// Whether a fill value survives conversion to the variable's type.
///
/// `native` is the fill after the cast, widened back to `f64`. Float casts
/// may round by one ulp of `f32`; integer casts that saturate or truncate
/// change the value and are rejected.
fn fill_is_representable(fill: f64, native: f64) -> bool {
    native == fill || (native - fill).abs() <= fill.abs() * f64::from(f32::EPSILON)
}

/// Read a typed slice, mask fill values to NaN and widen to `f64`.
///
/// The fill value is compared in the variable's own type so that `f32`
/// fills survive the round trip through `f64`. A fill outside the type's
/// range masks nothing.
macro_rules! read_as {
    ($var:expr, $extents:expr, $fill:expr, $t:ty) => {{
        let values: Vec<$t> = $var
            .get_values::<$t, _>($extents)
            .map_err(|e| OceanGridError::NetCDF(format!("Failed to read {} data: {}", stringify!($t), e)))?;
        let fill = $fill.and_then(|f: f64| {
            let native = f as $t;
            fill_is_representable(f, native as f64).then_some(native)
        });
        values
            .into_iter()
            .map(|x| if Some(x) == fill { f64::NAN } else { x as f64 })
            .collect::<Vec<f64>>()
    }};
}

fn read_variable_array(
    var: &netcdf::Variable<'_>,
    extents: &[Extent],
    shape: &[usize],
    fill: Option<f64>,
) -> Result<ArrayD<f64>> {
    let vartype = var.vartype();

    let values = match vartype {
        NcVariableType::Float(FloatType::F64) => read_as!(var, extents, fill, f64),
        NcVariableType::Float(FloatType::F32) => read_as!(var, extents, fill, f32),
        NcVariableType::Int(IntType::I64) => read_as!(var, extents, fill, i64),
        NcVariableType::Int(IntType::I32) => read_as!(var, extents, fill, i32),
        NcVariableType::Int(IntType::I16) => read_as!(var, extents, fill, i16),
        NcVariableType::Int(IntType::I8) => read_as!(var, extents, fill, i8),
        NcVariableType::Int(IntType::U64) => read_as!(var, extents, fill, u64),
        NcVariableType::Int(IntType::U32) => read_as!(var, extents, fill, u32),
        NcVariableType::Int(IntType::U16) => read_as!(var, extents, fill, u16),
        NcVariableType::Int(IntType::U8) => read_as!(var, extents, fill, u8),
        NcVariableType::Char | NcVariableType::String => {
            return Err(OceanGridError::NetCDF(format!(
                "'{}' holds character data and cannot be read as numbers",
                var.name()
            )))
        }
        _ => {
            return Err(OceanGridError::NetCDF(format!(
                "Unsupported variable type: {:?}",
                vartype
            )))
        }
    };

    ArrayD::from_shape_vec(IxDyn(shape), values)
        .map_err(|e| OceanGridError::NetCDF(format!("Invalid shape/data size: {}", e)))
}

/// Render an attribute value as text.
///
/// Scalars print as themselves, arrays as comma-separated lists. Values the
/// binding cannot decode are shown as `<unreadable>`.
fn attr_value_to_string(attr: &netcdf::Attribute<'_>) -> String {
    let value = match attr.value() {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Unreadable attribute '{}': {}", attr.name(), e);
            return "<unreadable>".to_string();
        }
    };

    match value {
        AttributeValue::Str(s) => s,
        AttributeValue::Strs(v) => v.join(", "),
        AttributeValue::Uchar(v) => v.to_string(),
        AttributeValue::Schar(v) => v.to_string(),
        AttributeValue::Ushort(v) => v.to_string(),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Uint(v) => v.to_string(),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Ulonglong(v) => v.to_string(),
        AttributeValue::Longlong(v) => v.to_string(),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Uchars(v) => join_values(&v),
        AttributeValue::Schars(v) => join_values(&v),
        AttributeValue::Ushorts(v) => join_values(&v),
        AttributeValue::Shorts(v) => join_values(&v),
        AttributeValue::Uints(v) => join_values(&v),
        AttributeValue::Ints(v) => join_values(&v),
        AttributeValue::Ulonglongs(v) => join_values(&v),
        AttributeValue::Longlongs(v) => join_values(&v),
        AttributeValue::Floats(v) => join_values(&v),
        AttributeValue::Doubles(v) => join_values(&v),
    }
}

fn join_values<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
