//! Marker substitution.

use crate::{ArgumentShapeError, Path, ResolvedPath, Segment};
use imut_value::Value;

/// Replace every marker in `paths` with a key taken from `arg`.
///
/// A missing argument behaves like `undefined`, so any path that uses a
/// marker fails when none was supplied.
pub fn resolve(paths: &[Path], arg: Option<&Value>) -> Result<Vec<ResolvedPath>, ArgumentShapeError> {
    let undefined = Value::Undefined;
    let arg = arg.unwrap_or(&undefined);
    paths
        .iter()
        .map(|path| {
            let keys = path
                .segments
                .iter()
                .map(|segment| resolve_segment(segment, arg))
                .collect::<Result<_, _>>()?;
            Ok(ResolvedPath {
                keys,
                effect: path.effect,
            })
        })
        .collect()
}

fn resolve_segment(segment: &Segment, arg: &Value) -> Result<String, ArgumentShapeError> {
    match segment {
        Segment::Key(key) => Ok(key.clone()),
        Segment::WholeArg => arg.to_key().ok_or(ArgumentShapeError::ExpectedKey {
            found: arg.type_name(),
        }),
        Segment::NamedArg(field) => {
            let value = match arg {
                Value::Record(record) => record.fields.get(field),
                Value::Map(entries) => entries.get(field),
                other => {
                    return Err(ArgumentShapeError::ExpectedRecord {
                        field: field.clone(),
                        found: other.type_name(),
                    })
                }
            };
            let value = value.ok_or_else(|| ArgumentShapeError::MissingField {
                field: field.clone(),
            })?;
            value.to_key().ok_or_else(|| ArgumentShapeError::FieldNotKey {
                field: field.clone(),
                found: value.type_name(),
            })
        }
    }
}
