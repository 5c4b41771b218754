//! San Francisco neighborhood quiz engine.
//!
//! Loads neighborhood boundaries into an [`atlas::Atlas`], runs the
//! click-to-identify [`quiz::Quiz`] over them, and drives any
//! [`render::RenderSurface`] through [`render::MapView`]. Geolocation
//! fixes resolve to the containing neighborhood plus the ones the
//! accuracy circle touches.
//!
//! With the `python` feature the JSON entry points in [`api`] are
//! importable from Python.

pub mod api;
pub mod atlas;
pub mod error;
pub mod geometry;
pub mod location;
pub mod prng;
pub mod projection;
pub mod quiz;
pub mod render;
pub mod shuffle;
pub mod svg;
pub mod types;

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;

    fn to_py_err(e: crate::error::AtlasError) -> PyErr {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
    }

    /// Locate a fix. Takes the dataset JSON and a `LocateRequest` JSON
    /// string (a fix, optionally with `circle_step_deg`) and returns a
    /// `LocationReport` JSON string.
    #[pyfunction]
    fn locate_json(dataset_json: &str, fix_json: &str) -> PyResult<String> {
        crate::api::locate_json(dataset_json, fix_json).map_err(to_py_err)
    }

    /// Render the dataset to an SVG document.
    #[pyfunction]
    #[pyo3(signature = (dataset_json, params_json = ""))]
    fn render_svg_json(dataset_json: &str, params_json: &str) -> PyResult<String> {
        crate::api::render_svg_json(dataset_json, params_json).map_err(to_py_err)
    }

    #[pymodule]
    fn neighb_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(locate_json, m)?)?;
        m.add_function(wrap_pyfunction!(render_svg_json, m)?)?;
        Ok(())
    }
}
