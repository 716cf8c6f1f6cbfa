//! HDF5 input reader.
//!
//! Layout consumed (read-only):
//!
//! ```text
//! /param                    attr force = "<force group>"
//! /param/box                attrs particles, length[], density
//! /param/<force group>      attr cutoff
//! /TEMP /PRESS /EPOT /TIME  1-D float datasets, one sample per step
//! ```
//!
//! Attributes may be stored as scalars or as arrays; both are read through
//! flat typed accessors and validated here.

use crate::error::AnalysisError;
use crate::source::{RunMetadata, ThermoSource};
use hdf5::types::{FixedAscii, FixedUnicode, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, Group};
use std::path::{Path, PathBuf};
use thermo_core::{Observable, ObservableSeries};
use tracing::debug;

const PARAM_GROUP: &str = "param";
const BOX_GROUP: &str = "box";

/// An open HDF5 input file.
pub struct H5mdFile {
    file: hdf5::File,
    path: PathBuf,
}

impl H5mdFile {
    /// Opens `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let file = hdf5::File::open(path).map_err(|e| AnalysisError::open(path, e))?;
        debug!("Opened {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Closes the underlying file handle.
    pub fn close(self) -> Result<(), AnalysisError> {
        let path = self.path;
        self.file.close().map_err(|e| AnalysisError::close(&path, e))
    }

    fn param(&self) -> Result<Group, AnalysisError> {
        self.file
            .group(PARAM_GROUP)
            .map_err(|e| AnalysisError::missing(PARAM_GROUP, e))
    }
}

impl ThermoSource for H5mdFile {
    fn metadata(&self) -> Result<RunMetadata, AnalysisError> {
        let param = self.param()?;

        let force = read_string(&param, PARAM_GROUP, "force")?;
        let force_key = format!("{}/{}", PARAM_GROUP, force);
        let force_group = param
            .group(&force)
            .map_err(|e| AnalysisError::missing(&force_key, e))?;

        let box_key = format!("{}/{}", PARAM_GROUP, BOX_GROUP);
        let box_group = param
            .group(BOX_GROUP)
            .map_err(|e| AnalysisError::missing(&box_key, e))?;

        Ok(RunMetadata {
            particles: read_u64s(&box_group, &box_key, "particles")?,
            cutoff: read_f64s(&force_group, &force_key, "cutoff")?,
            box_length: read_f64s(&box_group, &box_key, "length")?,
            density: read_scalar_f64(&box_group, &box_key, "density")?,
            force,
        })
    }

    fn series(&self, observable: Observable) -> Result<ObservableSeries, AnalysisError> {
        let name = observable.dataset();
        let dataset = self
            .file
            .dataset(name)
            .map_err(|e| AnalysisError::missing(name, e))?;

        if dataset.ndim() != 1 {
            return Err(AnalysisError::bad_shape(
                name,
                format!("expected 1-D dataset, found shape {:?}", dataset.shape()),
            ));
        }

        let samples = dataset
            .read_raw::<f64>()
            .map_err(|e| AnalysisError::bad_shape(name, e))?;
        debug!("Read {} samples from {}", samples.len(), name);

        Ok(ObservableSeries::new(observable, samples))
    }
}

fn open_attr(group: &Group, group_key: &str, name: &str) -> Result<Attribute, AnalysisError> {
    group
        .attr(name)
        .map_err(|e| AnalysisError::missing(format!("{}@{}", group_key, name), e))
}

fn read_f64s(group: &Group, group_key: &str, name: &str) -> Result<Vec<f64>, AnalysisError> {
    let values = open_attr(group, group_key, name)?
        .read_raw::<f64>()
        .map_err(|e| AnalysisError::bad_shape(format!("{}@{}", group_key, name), e))?;
    non_empty(values, group_key, name)
}

fn read_u64s(group: &Group, group_key: &str, name: &str) -> Result<Vec<u64>, AnalysisError> {
    let values = open_attr(group, group_key, name)?
        .read_raw::<u64>()
        .map_err(|e| AnalysisError::bad_shape(format!("{}@{}", group_key, name), e))?;
    non_empty(values, group_key, name)
}

fn read_scalar_f64(group: &Group, group_key: &str, name: &str) -> Result<f64, AnalysisError> {
    match read_f64s(group, group_key, name)?.as_slice() {
        [value] => Ok(*value),
        values => Err(AnalysisError::bad_shape(
            format!("{}@{}", group_key, name),
            format!("expected a single value, found {}", values.len()),
        )),
    }
}

fn non_empty<T>(values: Vec<T>, group_key: &str, name: &str) -> Result<Vec<T>, AnalysisError> {
    if values.is_empty() {
        return Err(AnalysisError::bad_shape(
            format!("{}@{}", group_key, name),
            "attribute is empty",
        ));
    }
    Ok(values)
}

/// Reads a string attribute regardless of its on-disk string flavour.
fn read_string(group: &Group, group_key: &str, name: &str) -> Result<String, AnalysisError> {
    let attr = open_attr(group, group_key, name)?;

    let value = if let Ok(v) = attr.read_raw::<VarLenUnicode>() {
        v.first().map(|s| s.as_str().to_owned())
    } else if let Ok(v) = attr.read_raw::<VarLenAscii>() {
        v.first().map(|s| s.as_str().to_owned())
    } else if let Ok(v) = attr.read_raw::<FixedAscii<256>>() {
        v.first().map(|s| s.as_str().to_owned())
    } else if let Ok(v) = attr.read_raw::<FixedUnicode<256>>() {
        v.first().map(|s| s.as_str().to_owned())
    } else {
        None
    };

    value
        .map(|s| s.trim_end_matches('\0').to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AnalysisError::bad_shape(format!("{}@{}", group_key, name), "expected a non-empty string")
        })
}

/// Writes a minimal input file for tests.
#[cfg(test)]
pub(crate) mod fixture {
    use hdf5::types::{FixedAscii, VarLenUnicode};
    use hdf5::Group;
    use std::path::Path;

    /// How parameter attributes are laid out on disk.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AttrLayout {
        /// Variable-length strings, one-element arrays
        VarLenArrays,

        /// Fixed 256-byte strings and scalars, as HALMD writes them
        FixedScalars,
    }

    pub struct Fixture {
        pub temp: Vec<f64>,
        pub press: Vec<f64>,
        pub epot: Vec<f64>,
        pub time: Vec<f64>,
    }

    impl Fixture {
        /// Smooth synthetic series of `len` steps.
        pub fn new(len: usize) -> Self {
            let steps: Vec<f64> = (0..len).map(|i| i as f64).collect();
            Self {
                temp: steps.iter().map(|s| 1.2 + 0.01 * (s * 0.3).sin()).collect(),
                press: steps.iter().map(|s| 5.0 + 0.1 * (s * 0.7).cos()).collect(),
                epot: steps.iter().map(|s| -5.5 + 0.02 * (s * 0.1).sin()).collect(),
                time: steps.iter().map(|s| s * 0.005).collect(),
            }
        }

        pub fn write(&self, path: &Path) -> hdf5::Result<()> {
            self.write_with(path, AttrLayout::VarLenArrays)
        }

        pub fn write_with(&self, path: &Path, layout: AttrLayout) -> hdf5::Result<()> {
            let file = hdf5::File::create(path)?;

            let param = file.create_group("param")?;
            let lj = param.create_group("lennard_jones")?;
            let bx = param.create_group("box")?;
            match layout {
                AttrLayout::VarLenArrays => write_array_attrs(&param, &lj, &bx)?,
                AttrLayout::FixedScalars => write_scalar_attrs(&param, &lj, &bx)?,
            }
            bx.new_attr::<f64>()
                .shape(3)
                .create("length")?
                .write_raw(&[11.0, 11.0, 11.0])?;

            for (name, data) in [
                ("TEMP", &self.temp),
                ("PRESS", &self.press),
                ("EPOT", &self.epot),
                ("TIME", &self.time),
            ] {
                file.new_dataset::<f64>()
                    .shape(data.len())
                    .create(name)?
                    .write_raw(data.as_slice())?;
            }

            file.close()
        }
    }

    fn write_array_attrs(param: &Group, lj: &Group, bx: &Group) -> hdf5::Result<()> {
        let force: VarLenUnicode = "lennard_jones".parse().unwrap();
        param
            .new_attr::<VarLenUnicode>()
            .shape(1)
            .create("force")?
            .write_raw(&[force])?;
        lj.new_attr::<f64>().shape(1).create("cutoff")?.write_raw(&[2.5])?;
        bx.new_attr::<u32>().shape(1).create("particles")?.write_raw(&[1000u32])?;
        bx.new_attr::<f64>().shape(1).create("density")?.write_raw(&[0.75])
    }

    fn write_scalar_attrs(param: &Group, lj: &Group, bx: &Group) -> hdf5::Result<()> {
        let force = FixedAscii::<256>::from_ascii(b"lennard_jones").unwrap();
        param
            .new_attr::<FixedAscii<256>>()
            .shape(())
            .create("force")?
            .write_scalar(&force)?;
        lj.new_attr::<f64>().shape(()).create("cutoff")?.write_scalar(&2.5)?;
        bx.new_attr::<u32>().shape(()).create("particles")?.write_scalar(&1000u32)?;
        bx.new_attr::<f64>().shape(()).create("density")?.write_scalar(&0.75)
    }
}

#[cfg(test)]
mod tests {
    use super::fixture::{AttrLayout, Fixture};
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = H5mdFile::open(dir.path().join("absent.h5")).err().unwrap();
        assert!(matches!(err, AnalysisError::Open { .. }));
    }

    #[test]
    fn test_read_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.h5");
        Fixture::new(40).write(&path).unwrap();

        let file = H5mdFile::open(&path).unwrap();
        let meta = file.metadata().unwrap();
        assert_eq!(meta.particles, vec![1000]);
        assert_eq!(meta.force, "lennard_jones");
        assert_eq!(meta.cutoff, vec![2.5]);
        assert_eq!(meta.box_length, vec![11.0, 11.0, 11.0]);
        assert_eq!(meta.density, 0.75);
        file.close().unwrap();
    }

    #[test]
    fn test_read_fixed_string_and_scalar_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let arrays = dir.path().join("arrays.h5");
        let scalars = dir.path().join("scalars.h5");
        let fixture = Fixture::new(20);
        fixture.write_with(&arrays, AttrLayout::VarLenArrays).unwrap();
        fixture.write_with(&scalars, AttrLayout::FixedScalars).unwrap();

        let expected = H5mdFile::open(&arrays).unwrap().metadata().unwrap();
        let file = H5mdFile::open(&scalars).unwrap();
        let meta = file.metadata().unwrap();
        assert_eq!(meta, expected);
        assert_eq!(meta.force, "lennard_jones");
        assert_eq!(meta.particles, vec![1000]);
        assert_eq!(meta.cutoff, vec![2.5]);
        assert_eq!(meta.density, 0.75);
        file.close().unwrap();
    }

    #[test]
    fn test_read_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.h5");
        let fixture = Fixture::new(40);
        fixture.write(&path).unwrap();

        let file = H5mdFile::open(&path).unwrap();
        let epot = file.series(Observable::PotentialEnergy).unwrap();
        assert_eq!(epot.observable(), Observable::PotentialEnergy);
        assert_eq!(epot.samples(), fixture.epot.as_slice());
        assert_eq!(file.series(Observable::Time).unwrap().len(), 40);
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.h5");
        hdf5::File::create(&path).unwrap().close().unwrap();

        let file = H5mdFile::open(&path).unwrap();
        let err = file.series(Observable::Temperature).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingKey { ref key, .. } if key == "TEMP"));

        let err = file.metadata().unwrap_err();
        assert!(matches!(err, AnalysisError::MissingKey { ref key, .. } if key == "param"));
    }
}
