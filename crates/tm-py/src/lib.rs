//! TM-Py: Python bindings for the tech-metrics indicators
//!
//! Thin PyO3 wrappers over `tm-core`: NumPy arrays in, NumPy arrays out,
//! every [`IndicatorError`] raised as `ValueError`. Policy enums are passed as
//! their snake_case names (`"wraparound"`, `"skip_first"`, ...).
//!
//! Note: This crate requires a Python 3.x interpreter to build.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_pass_by_value)]

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tm_core::{
    momentum::{self, MacdParams, RsiParams, RsiWindow, ZeroLossPolicy},
    overlap::{self, SarParams, Trend},
    volatility::{self, AtrParams, PrevClose},
    volume::{self, ForceIndexParams, VolumeAlignment},
    IndicatorError,
};

type Array<'py> = Bound<'py, PyArray1<f64>>;

fn to_py_err(e: IndicatorError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn unknown_policy(name: &str, value: &str, expected: &str) -> PyErr {
    PyValueError::new_err(format!(
        "Unknown {} '{}': expected one of {}",
        name, value, expected
    ))
}

fn prev_close(value: &str) -> PyResult<PrevClose> {
    match value {
        "wraparound" => Ok(PrevClose::Wraparound),
        "skip_first" => Ok(PrevClose::SkipFirst),
        other => Err(unknown_policy("prev_close", other, "'wraparound', 'skip_first'")),
    }
}

fn rsi_window(value: &str) -> PyResult<RsiWindow> {
    match value {
        "partitioned" => Ok(RsiWindow::Partitioned),
        "trailing" => Ok(RsiWindow::Trailing),
        other => Err(unknown_policy("window", other, "'partitioned', 'trailing'")),
    }
}

fn zero_loss(value: &str) -> PyResult<ZeroLossPolicy> {
    match value {
        "saturate" => Ok(ZeroLossPolicy::Saturate),
        "reject" => Ok(ZeroLossPolicy::Reject),
        other => Err(unknown_policy("zero_loss", other, "'saturate', 'reject'")),
    }
}

fn volume_alignment(value: &str) -> PyResult<VolumeAlignment> {
    match value {
        "leading" => Ok(VolumeAlignment::Leading),
        "current" => Ok(VolumeAlignment::Current),
        other => Err(unknown_policy("volume_alignment", other, "'leading', 'current'")),
    }
}

/// Moving average over a sliding window.
///
/// Returns an array of `len(data) - window + 1` means.
#[pyfunction]
#[pyo3(signature = (data, window))]
fn moving_average<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
    window: usize,
) -> PyResult<Array<'py>> {
    let out = overlap::moving_average(data.as_slice()?, window).map_err(to_py_err)?;
    Ok(PyArray1::from_vec_bound(py, out))
}

/// Exponential moving average seeded with the first value.
#[pyfunction]
#[pyo3(signature = (data, window))]
fn ema<'py>(
    py: Python<'py>,
    data: PyReadonlyArray1<'py, f64>,
    window: usize,
) -> PyResult<Array<'py>> {
    let out = overlap::ema(data.as_slice()?, window).map_err(to_py_err)?;
    Ok(PyArray1::from_vec_bound(py, out))
}

/// MACD line, signal line and histogram.
///
/// Returns:
///     Tuple of `(macd, signal, histogram)` arrays, each as long as `closes`
#[pyfunction]
#[pyo3(signature = (closes, fast=12, slow=26, signal=9))]
fn macd<'py>(
    py: Python<'py>,
    closes: PyReadonlyArray1<'py, f64>,
    fast: usize,
    slow: usize,
    signal: usize,
) -> PyResult<(Array<'py>, Array<'py>, Array<'py>)> {
    let params = MacdParams { fast, slow, signal };
    let out = momentum::macd(closes.as_slice()?, &params).map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec_bound(py, out.macd),
        PyArray1::from_vec_bound(py, out.signal),
        PyArray1::from_vec_bound(py, out.histogram),
    ))
}

/// Relative Strength Index of the whole price window.
#[pyfunction]
#[pyo3(signature = (prices, period=14, window="partitioned", zero_loss="saturate"))]
fn rsi(
    prices: PyReadonlyArray1<'_, f64>,
    period: usize,
    window: &str,
    zero_loss: &str,
) -> PyResult<f64> {
    let params = RsiParams {
        period,
        window: rsi_window(window)?,
        zero_loss: self::zero_loss(zero_loss)?,
    };
    momentum::rsi(prices.as_slice()?, &params).map_err(to_py_err)
}

/// Elder Force Index smoothed by a moving average.
#[pyfunction]
#[pyo3(signature = (closes, volumes, window=13, volume_alignment="leading"))]
fn elder_force_index<'py>(
    py: Python<'py>,
    closes: PyReadonlyArray1<'py, f64>,
    volumes: PyReadonlyArray1<'py, f64>,
    window: usize,
    volume_alignment: &str,
) -> PyResult<Array<'py>> {
    let params = ForceIndexParams {
        window,
        volume_alignment: self::volume_alignment(volume_alignment)?,
    };
    let out = volume::elder_force_index(closes.as_slice()?, volumes.as_slice()?, &params)
        .map_err(to_py_err)?;
    Ok(PyArray1::from_vec_bound(py, out))
}

/// True range per bar.
#[pyfunction]
#[pyo3(signature = (high, low, close, prev_close="wraparound"))]
fn true_range<'py>(
    py: Python<'py>,
    high: PyReadonlyArray1<'py, f64>,
    low: PyReadonlyArray1<'py, f64>,
    close: PyReadonlyArray1<'py, f64>,
    prev_close: &str,
) -> PyResult<Array<'py>> {
    let out = volatility::true_range(
        high.as_slice()?,
        low.as_slice()?,
        close.as_slice()?,
        self::prev_close(prev_close)?,
    )
    .map_err(to_py_err)?;
    Ok(PyArray1::from_vec_bound(py, out))
}

/// Full Average True Range series.
#[pyfunction]
#[pyo3(signature = (high, low, close, period=14, prev_close="wraparound"))]
fn atr_series<'py>(
    py: Python<'py>,
    high: PyReadonlyArray1<'py, f64>,
    low: PyReadonlyArray1<'py, f64>,
    close: PyReadonlyArray1<'py, f64>,
    period: usize,
    prev_close: &str,
) -> PyResult<Array<'py>> {
    let params = AtrParams {
        period,
        prev_close: self::prev_close(prev_close)?,
        ..AtrParams::default()
    };
    let out = volatility::atr_series(high.as_slice()?, low.as_slice()?, close.as_slice()?, &params)
        .map_err(to_py_err)?;
    Ok(PyArray1::from_vec_bound(py, out))
}

/// Average True Range: mean of the last `tail` ATR values.
#[pyfunction]
#[pyo3(signature = (high, low, close, period=14, tail=5, prev_close="wraparound"))]
fn atr(
    high: PyReadonlyArray1<'_, f64>,
    low: PyReadonlyArray1<'_, f64>,
    close: PyReadonlyArray1<'_, f64>,
    period: usize,
    tail: usize,
    prev_close: &str,
) -> PyResult<f64> {
    let params = AtrParams {
        period,
        tail,
        prev_close: self::prev_close(prev_close)?,
    };
    volatility::atr(high.as_slice()?, low.as_slice()?, close.as_slice()?, &params)
        .map_err(to_py_err)
}

/// Parabolic SAR.
///
/// Returns:
///     Tuple of `(sar, trend)`: a float array (NaN for the two seed bars) and
///     a list of `"up"`, `"down"` or `None` labels
#[pyfunction]
#[pyo3(signature = (high, low, acceleration=0.02, max_acceleration=0.2))]
fn sar<'py>(
    py: Python<'py>,
    high: PyReadonlyArray1<'py, f64>,
    low: PyReadonlyArray1<'py, f64>,
    acceleration: f64,
    max_acceleration: f64,
) -> PyResult<(Array<'py>, Vec<Option<&'static str>>)> {
    let params = SarParams {
        acceleration,
        max_acceleration,
    };
    let out = overlap::sar(high.as_slice()?, low.as_slice()?, &params).map_err(to_py_err)?;
    let labels = out
        .trend
        .iter()
        .map(|trend| match trend {
            Trend::Uninitialized => None,
            labelled => Some(labelled.as_str()),
        })
        .collect();
    Ok((PyArray1::from_vec_bound(py, out.sar), labels))
}

/// Highest high and lowest low of the last `window` bars.
#[pyfunction]
#[pyo3(signature = (high, low, window=20))]
fn donchian_channel(
    high: PyReadonlyArray1<'_, f64>,
    low: PyReadonlyArray1<'_, f64>,
    window: usize,
) -> PyResult<(f64, f64)> {
    overlap::donchian_channel(high.as_slice()?, low.as_slice()?, window).map_err(to_py_err)
}

/// Rolling Donchian Channel as `(upper, lower)` arrays.
#[pyfunction]
#[pyo3(signature = (high, low, window=20))]
fn donchian_series<'py>(
    py: Python<'py>,
    high: PyReadonlyArray1<'py, f64>,
    low: PyReadonlyArray1<'py, f64>,
    window: usize,
) -> PyResult<(Array<'py>, Array<'py>)> {
    let out = overlap::donchian_series(high.as_slice()?, low.as_slice()?, window)
        .map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec_bound(py, out.upper),
        PyArray1::from_vec_bound(py, out.lower),
    ))
}

/// Python module for technical analysis indicators
#[pymodule]
fn tech_metrics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(moving_average, m)?)?;
    m.add_function(wrap_pyfunction!(ema, m)?)?;
    m.add_function(wrap_pyfunction!(macd, m)?)?;
    m.add_function(wrap_pyfunction!(rsi, m)?)?;
    m.add_function(wrap_pyfunction!(elder_force_index, m)?)?;
    m.add_function(wrap_pyfunction!(true_range, m)?)?;
    m.add_function(wrap_pyfunction!(atr_series, m)?)?;
    m.add_function(wrap_pyfunction!(atr, m)?)?;
    m.add_function(wrap_pyfunction!(sar, m)?)?;
    m.add_function(wrap_pyfunction!(donchian_channel, m)?)?;
    m.add_function(wrap_pyfunction!(donchian_series, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
