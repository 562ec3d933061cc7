// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC decoding engine handle.
//!
//! The heavy geometry pipeline is an external concern; this module carries
//! the handle's lifecycle (asynchronous initialization gated on the support
//! data directory) and a single-pass inspection decode: STEP envelope
//! validation, schema sniffing, entity counting and a cartesian-point bounds
//! scan that yields the camera framing target.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::engine::Bounds;
use crate::error::{Error, Result};

/// IFC schema version detected in a model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IfcSchema {
    Ifc2x3,
    Ifc4,
    Ifc4x3,
    Unknown,
}

impl IfcSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            IfcSchema::Ifc2x3 => "IFC2X3",
            IfcSchema::Ifc4 => "IFC4",
            IfcSchema::Ifc4x3 => "IFC4X3",
            IfcSchema::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for IfcSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of decoding one model file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedModel {
    pub name: String,
    pub schema: IfcSchema,
    pub entity_count: usize,
    pub bounds: Bounds,
}

/// Handle to the decoding engine.
///
/// Must complete [`DecoderEngine::initialize`] before any decode is
/// attempted; a missing support data directory is a fatal configuration
/// error propagated to the caller.
#[derive(Debug)]
pub struct DecoderEngine {
    data_dir: PathBuf,
}

impl DecoderEngine {
    /// Initialize the engine against its support data directory.
    pub async fn initialize(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        match tokio::fs::metadata(&data_dir).await {
            Ok(meta) if meta.is_dir() => {
                tracing::info!(data_dir = %data_dir.display(), "decoder initialized");
                Ok(Self { data_dir })
            }
            _ => Err(Error::DecoderDataMissing {
                path: data_dir.display().to_string(),
            }),
        }
    }

    /// Support data directory the engine was initialized with.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Inspect a model file's content.
    pub fn decode(&self, name: &str, content: &str) -> Result<DecodedModel> {
        if !content.trim_start().starts_with("ISO-10303-21") {
            return Err(Error::InvalidModel {
                name: name.to_string(),
                reason: "missing ISO-10303-21 header".into(),
            });
        }

        let schema = sniff_schema(content);
        let mut entity_count = 0;
        let mut bounds = Bounds::new();

        let mut scanner = EntityScanner::new(content);
        while let Some((_id, type_name, start, end)) = scanner.next_entity() {
            entity_count += 1;
            if type_name == "IFCCARTESIANPOINT" {
                if let Some((x, y, z)) = extract_point_coordinates(&content[start..end]) {
                    let z = z.unwrap_or(0.0);
                    if x.is_finite() && y.is_finite() && z.is_finite() {
                        bounds.expand(x, y, z);
                    }
                }
            }
        }

        if entity_count == 0 {
            return Err(Error::InvalidModel {
                name: name.to_string(),
                reason: "no entities in DATA section".into(),
            });
        }

        tracing::debug!(
            model = %name,
            schema = %schema,
            entities = entity_count,
            points = bounds.sample_count,
            "model decoded"
        );

        Ok(DecodedModel {
            name: name.to_string(),
            schema,
            entity_count,
            bounds,
        })
    }
}

/// Detect the schema version from the file content.
fn sniff_schema(content: &str) -> IfcSchema {
    if content.contains("IFC4X3") {
        IfcSchema::Ifc4x3
    } else if content.contains("IFC4") {
        IfcSchema::Ifc4
    } else if content.contains("IFC2X3") {
        IfcSchema::Ifc2x3
    } else {
        IfcSchema::Unknown
    }
}

/// Minimal forward scanner over `#id=TYPE(...);` entity records.
struct EntityScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> EntityScanner<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Scan for the next entity, returning (id, type name, start, end).
    fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        loop {
            let remaining = &self.content[self.position..];
            let start_offset = remaining.find('#')?;
            let record_start = self.position + start_offset;

            let record = &self.content[record_start..];
            let end_offset = record.find(';')?;
            let record_end = record_start + end_offset + 1;
            self.position = record_end;

            // Parse entity id
            let id_start = record_start + 1;
            let id_end = self.content[id_start..record_end]
                .find(|c: char| !c.is_ascii_digit())
                .map(|i| id_start + i)
                .unwrap_or(record_end);
            let Ok(id) = self.content[id_start..id_end].parse::<u32>() else {
                continue;
            };

            // Parse type name after '='
            let Some(eq_offset) = self.content[id_end..record_end].find('=') else {
                continue;
            };
            let type_start = id_end + eq_offset + 1;
            let Some(ws) = self.content[type_start..record_end].find(|c: char| !c.is_whitespace())
            else {
                continue;
            };
            let type_start = type_start + ws;
            let type_end = self.content[type_start..record_end]
                .find(|c: char| c == '(' || c.is_whitespace())
                .map(|i| type_start + i)
                .unwrap_or(record_end);

            return Some((id, &self.content[type_start..type_end], record_start, record_end));
        }
    }
}

/// Extract coordinates from `IFCCARTESIANPOINT((x,y))` or `((x,y,z))` text.
fn extract_point_coordinates(text: &str) -> Option<(f64, f64, Option<f64>)> {
    let start = text.find("((")?;
    let end = text.rfind("))")?;
    if start >= end {
        return None;
    }

    let parts: Vec<&str> = text[start + 2..end].split(',').collect();
    if parts.len() < 2 {
        return None;
    }

    let x = parts[0].trim().parse::<f64>().ok()?;
    let y = parts[1].trim().parse::<f64>().ok()?;
    let z = parts.get(2).and_then(|p| p.trim().parse::<f64>().ok());
    Some((x, y, z))
}
