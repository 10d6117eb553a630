//! Serializable build artifact and the samples table.

use anyhow::{Context, Result};
use dirichlet::api::{BisectorShape, Cx, DirichletBuild, Mat2c, SampleSet};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// `[re, im]` per entry, row-major `a, b, c, d`.
type MatrixOut = [[f64; 2]; 4];

#[derive(Serialize)]
pub struct BuildArtifact {
    pub generators: Vec<MatrixOut>,
    pub elements: Vec<ElementOut>,
    pub faces: Vec<FaceOut>,
    pub region: RegionOut,
    pub samples_found: usize,
    pub samples_target: usize,
    pub sample_attempts: usize,
    pub log: Vec<String>,
}

#[derive(Serialize)]
pub struct ElementOut {
    pub word: String,
    pub length: usize,
    pub matrix: MatrixOut,
    /// `[x, y, t]`, absent when the orbit point was skipped.
    pub orbit: Option<[f64; 3]>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaceOut {
    Hemisphere {
        word: String,
        center: [f64; 2],
        radius: f64,
    },
    Plane {
        word: String,
        normal: [f64; 2],
        offset: f64,
    },
}

#[derive(Serialize)]
pub struct RegionOut {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

fn cx(z: Cx) -> [f64; 2] {
    [z.re, z.im]
}

fn matrix(m: &Mat2c) -> MatrixOut {
    [cx(m[(0, 0)]), cx(m[(0, 1)]), cx(m[(1, 0)]), cx(m[(1, 1)])]
}

impl BuildArtifact {
    pub fn from_build(b: &DirichletBuild) -> Self {
        let mut orbit = vec![None; b.enumeration.len()];
        for rec in &b.orbit {
            orbit[rec.element] = Some([rec.point.w.re, rec.point.w.im, rec.point.t]);
        }
        let elements = b
            .enumeration
            .elements
            .iter()
            .zip(orbit)
            .map(|(e, orbit)| ElementOut {
                word: e.word.to_string(),
                length: e.word_length(),
                matrix: matrix(&e.matrix),
                orbit,
            })
            .collect();
        let faces = b
            .faces
            .iter()
            .map(|f| {
                let word = b.enumeration.elements[f.element].word.to_string();
                match f.bisector.shape {
                    BisectorShape::Hemisphere { center, radius } => FaceOut::Hemisphere {
                        word,
                        center: cx(center),
                        radius,
                    },
                    BisectorShape::HalfPlane { normal, offset } => FaceOut::Plane {
                        word,
                        normal: cx(normal),
                        offset,
                    },
                }
            })
            .collect();
        Self {
            generators: b.generators.iter().map(matrix).collect(),
            elements,
            faces,
            region: RegionOut {
                min: [b.region.min.x, b.region.min.y, b.region.min.z],
                max: [b.region.max.x, b.region.max.y, b.region.max.z],
            },
            samples_found: b.samples.points.len(),
            samples_target: b.samples.target,
            sample_attempts: b.samples.attempts,
            log: b.log.entries.iter().map(|e| e.message.clone()).collect(),
        }
    }
}

/// Samples as an `x, y, t` frame.
pub fn samples_frame(samples: &SampleSet) -> PolarsResult<DataFrame> {
    let xs: Vec<f64> = samples.points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = samples.points.iter().map(|p| p.y).collect();
    let ts: Vec<f64> = samples.points.iter().map(|p| p.z).collect();
    df!("x" => xs, "y" => ys, "t" => ts)
}

/// Write samples as Parquet for `.parquet` paths and CSV otherwise.
pub fn write_samples(path: &Path, samples: &SampleSet) -> Result<()> {
    let mut df = samples_frame(samples)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(&mut file)
                .finish(&mut df)
                .with_context(|| format!("writing parquet {}", path.display()))?;
        }
        _ => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)
                .with_context(|| format!("writing csv {}", path.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirichlet::api::{build, parse_generator, CancelToken, DirichletCfg};
    use tempfile::tempdir;

    fn parabolic_build() -> DirichletBuild {
        let g = parse_generator("1,1,0,1").unwrap();
        let cfg = DirichletCfg {
            max_word_length: 1,
            sample_count: 200,
            boundary_tolerance: 0.1,
            seed: 3,
            ..DirichletCfg::default()
        };
        build(&[g], &cfg, &CancelToken::new()).unwrap()
    }

    #[test]
    fn artifact_lists_planes_with_words() {
        let art = BuildArtifact::from_build(&parabolic_build());
        assert_eq!(art.elements.len(), 3);
        assert_eq!(art.elements[0].word, "e");
        let v = serde_json::to_value(&art).unwrap();
        assert_eq!(v["faces"][0]["kind"], "plane");
        assert_eq!(v["faces"][0]["word"], "a");
        assert_eq!(v["faces"][1]["word"], "A");
        assert!((v["faces"][0]["offset"].as_f64().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn samples_round_trip_through_csv() {
        let b = parabolic_build();
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        write_samples(&path, &b.samples).unwrap();
        let df = LazyCsvReader::new(&path)
            .with_has_header(true)
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        assert!(df.height() > 0);
        assert_eq!(df.height(), b.samples.points.len());
        assert_eq!(df.width(), 3);
    }
}
