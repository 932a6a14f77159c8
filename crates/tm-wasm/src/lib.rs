//! TM-Wasm: WebAssembly bindings for the tech-metrics indicators
//!
//! Functions take `Float64Array` inputs and return `Float64Array` outputs.
//! Indicator errors are thrown as JavaScript `Error`s carrying the
//! [`IndicatorError`] message. Policy arguments are optional strings using the
//! snake_case policy names; omitted arguments take the library defaults.

use tm_core::{
    momentum::{self, MacdParams, RsiParams, RsiWindow, ZeroLossPolicy},
    overlap::{self, SarParams, Trend},
    volatility::{self, AtrParams, PrevClose},
    volume::{self, ForceIndexParams, VolumeAlignment},
    IndicatorError,
};
use wasm_bindgen::prelude::*;

fn to_js_err(e: IndicatorError) -> JsError {
    JsError::new(&e.to_string())
}

fn prev_close(value: Option<String>) -> Result<PrevClose, JsError> {
    match value.as_deref() {
        None | Some("wraparound") => Ok(PrevClose::Wraparound),
        Some("skip_first") => Ok(PrevClose::SkipFirst),
        Some(other) => Err(JsError::new(&format!("Unknown prev_close '{}'", other))),
    }
}

fn rsi_window(value: Option<String>) -> Result<RsiWindow, JsError> {
    match value.as_deref() {
        None | Some("partitioned") => Ok(RsiWindow::Partitioned),
        Some("trailing") => Ok(RsiWindow::Trailing),
        Some(other) => Err(JsError::new(&format!("Unknown rsi window '{}'", other))),
    }
}

fn zero_loss(value: Option<String>) -> Result<ZeroLossPolicy, JsError> {
    match value.as_deref() {
        None | Some("saturate") => Ok(ZeroLossPolicy::Saturate),
        Some("reject") => Ok(ZeroLossPolicy::Reject),
        Some(other) => Err(JsError::new(&format!("Unknown zero_loss '{}'", other))),
    }
}

fn volume_alignment(value: Option<String>) -> Result<VolumeAlignment, JsError> {
    match value.as_deref() {
        None | Some("leading") => Ok(VolumeAlignment::Leading),
        Some("current") => Ok(VolumeAlignment::Current),
        Some(other) => Err(JsError::new(&format!("Unknown volume_alignment '{}'", other))),
    }
}

/// Route Rust panics to `console.error`.
#[cfg(feature = "console_error_panic_hook")]
#[wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// MACD result: three series as long as the input.
#[wasm_bindgen]
pub struct MacdResult {
    macd: Vec<f64>,
    signal: Vec<f64>,
    histogram: Vec<f64>,
}

#[wasm_bindgen]
impl MacdResult {
    /// MACD line
    #[wasm_bindgen(getter)]
    pub fn macd(&self) -> Vec<f64> {
        self.macd.clone()
    }

    /// Signal line
    #[wasm_bindgen(getter)]
    pub fn signal(&self) -> Vec<f64> {
        self.signal.clone()
    }

    /// MACD minus signal
    #[wasm_bindgen(getter)]
    pub fn histogram(&self) -> Vec<f64> {
        self.histogram.clone()
    }
}

/// Parabolic SAR result.
#[wasm_bindgen]
pub struct SarResult {
    sar: Vec<f64>,
    trend: Vec<i8>,
}

#[wasm_bindgen]
impl SarResult {
    /// SAR level per bar, `NaN` for the two seed bars
    #[wasm_bindgen(getter)]
    pub fn sar(&self) -> Vec<f64> {
        self.sar.clone()
    }

    /// Trend per bar: `1` up, `-1` down, `0` uninitialized
    #[wasm_bindgen(getter)]
    pub fn trend(&self) -> Vec<i8> {
        self.trend.clone()
    }
}

/// Rolling Donchian Channel result.
#[wasm_bindgen]
pub struct DonchianResult {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

#[wasm_bindgen]
impl DonchianResult {
    /// Highest high per window
    #[wasm_bindgen(getter)]
    pub fn upper(&self) -> Vec<f64> {
        self.upper.clone()
    }

    /// Lowest low per window
    #[wasm_bindgen(getter)]
    pub fn lower(&self) -> Vec<f64> {
        self.lower.clone()
    }
}

fn trend_code(trend: Trend) -> i8 {
    match trend {
        Trend::Uninitialized => 0,
        Trend::Up => 1,
        Trend::Down => -1,
    }
}

/// Moving average over a sliding window.
#[wasm_bindgen(js_name = movingAverage)]
pub fn moving_average(data: &[f64], window: usize) -> Result<Vec<f64>, JsError> {
    overlap::moving_average(data, window).map_err(to_js_err)
}

/// Exponential moving average seeded with the first value.
#[wasm_bindgen]
pub fn ema(data: &[f64], window: usize) -> Result<Vec<f64>, JsError> {
    overlap::ema(data, window).map_err(to_js_err)
}

/// MACD with the given fast, slow and signal windows.
#[wasm_bindgen]
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Result<MacdResult, JsError> {
    let out = momentum::macd(closes, &MacdParams { fast, slow, signal }).map_err(to_js_err)?;
    Ok(MacdResult {
        macd: out.macd,
        signal: out.signal,
        histogram: out.histogram,
    })
}

/// Relative Strength Index of the whole price window.
#[wasm_bindgen]
pub fn rsi(
    prices: &[f64],
    period: usize,
    window: Option<String>,
    zero_loss: Option<String>,
) -> Result<f64, JsError> {
    let params = RsiParams {
        period,
        window: rsi_window(window)?,
        zero_loss: self::zero_loss(zero_loss)?,
    };
    momentum::rsi(prices, &params).map_err(to_js_err)
}

/// Elder Force Index smoothed over `window` bars.
#[wasm_bindgen(js_name = elderForceIndex)]
pub fn elder_force_index(
    closes: &[f64],
    volumes: &[f64],
    window: usize,
    volume_alignment: Option<String>,
) -> Result<Vec<f64>, JsError> {
    let params = ForceIndexParams {
        window,
        volume_alignment: self::volume_alignment(volume_alignment)?,
    };
    volume::elder_force_index(closes, volumes, &params).map_err(to_js_err)
}

/// True range per bar.
#[wasm_bindgen(js_name = trueRange)]
pub fn true_range(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    prev_close: Option<String>,
) -> Result<Vec<f64>, JsError> {
    volatility::true_range(high, low, close, self::prev_close(prev_close)?).map_err(to_js_err)
}

/// Full Average True Range series.
#[wasm_bindgen(js_name = atrSeries)]
pub fn atr_series(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    prev_close: Option<String>,
) -> Result<Vec<f64>, JsError> {
    let params = AtrParams {
        period,
        prev_close: self::prev_close(prev_close)?,
        ..AtrParams::default()
    };
    volatility::atr_series(high, low, close, &params).map_err(to_js_err)
}

/// Average True Range: mean of the last `tail` ATR values.
#[wasm_bindgen]
pub fn atr(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    tail: usize,
    prev_close: Option<String>,
) -> Result<f64, JsError> {
    let params = AtrParams {
        period,
        tail,
        prev_close: self::prev_close(prev_close)?,
    };
    volatility::atr(high, low, close, &params).map_err(to_js_err)
}

/// Parabolic SAR with the given acceleration step and cap.
#[wasm_bindgen]
pub fn sar(
    high: &[f64],
    low: &[f64],
    acceleration: f64,
    max_acceleration: f64,
) -> Result<SarResult, JsError> {
    let params = SarParams {
        acceleration,
        max_acceleration,
    };
    let out = overlap::sar(high, low, &params).map_err(to_js_err)?;
    Ok(SarResult {
        sar: out.sar,
        trend: out.trend.into_iter().map(trend_code).collect(),
    })
}

/// Donchian Channel of the last `window` bars as `[upper, lower]`.
#[wasm_bindgen(js_name = donchianChannel)]
pub fn donchian_channel(high: &[f64], low: &[f64], window: usize) -> Result<Vec<f64>, JsError> {
    let (upper, lower) = overlap::donchian_channel(high, low, window).map_err(to_js_err)?;
    Ok(vec![upper, lower])
}

/// Rolling Donchian Channel, one `(upper, lower)` pair per full window.
#[wasm_bindgen(js_name = donchianSeries)]
pub fn donchian_series(high: &[f64], low: &[f64], window: usize) -> Result<DonchianResult, JsError> {
    let out = overlap::donchian_series(high, low, window).map_err(to_js_err)?;
    Ok(DonchianResult {
        upper: out.upper,
        lower: out.lower,
    })
}
