//! # rtk-float
//!
//! Allocation-free RTK float-ambiguity Kalman filter, no-std compatible.
//! Estimates a receiver baseline (position and velocity) together with one
//! real-valued carrier-phase ambiguity per double difference, carrying the
//! covariance as UD factors so that thousands of recursive updates keep it
//! symmetric and positive semidefinite.
//!
//! ## Quick start
//!
//! ```
//! use rtk_float::{get_kf, least_squares_solve, FilterParams, FilterState, SingleDifference};
//!
//! let positions = [
//!     [-1.2e7, -2.0e7, 1.0e7],
//!     [5.0e6, -2.5e7, 5.0e6],
//!     [-2.2e7, -5.0e6, 1.3e7],
//!     [-8.0e6, -1.2e7, 2.2e7],
//! ];
//! let sdiffs: [SingleDifference; 4] = core::array::from_fn(|i| SingleDifference {
//!     prn: i as u8 + 1,
//!     sat_pos: positions[i],
//!     ..Default::default()
//! });
//! let ref_ecef = [-2.7e6, -4.3e6, 3.85e6];
//!
//! let kf = get_kf(&FilterParams::default(), &sdiffs, &ref_ecef).unwrap();
//!
//! // Snapshot of double differences generated from a known state
//! let mut truth = rtk_float::kf::StateVector::zeros(kf.state_dim());
//! truth[0] = 1.5;
//! truth[6] = 4.0;
//! let z = kf.obs_mtx().mul_vec(&truth);
//!
//! let x = least_squares_solve(&kf, &z).unwrap();
//! assert!((x[0] - 1.5).abs() < 1e-6);
//!
//! let mut state = FilterState::from_least_squares(&kf, &z, 1.0).unwrap();
//! kf.filter_update(&mut state, &z).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`kf`] — The filter. [`KfConfig`] assembles the transition model,
//!   process noise, double-difference observation matrix and decorrelation
//!   transform for one tracked constellation ([`get_kf`],
//!   [`get_kf_from_alms`]); [`KfConfig::filter_update`] runs one
//!   predict/decorrelate/update epoch on a [`FilterState`];
//!   [`least_squares_solve`] gives a snapshot solution for (re)initialization.
//!
//! - [`ud`] — UD factorization (`P = U·D·Uᵀ`), Bierman's scalar measurement
//!   update and Thornton's MWG-S time update.
//!
//! - [`gnss`] — [`GpsTime`], GPS [`Almanac`] propagation,
//!   [`SingleDifference`] records and the [`SatellitePositions`] source the
//!   geometry is built from.
//!
//! - [`matrix`] — Fixed-capacity [`BoundedMatrix<T, R, C>`] and
//!   [`BoundedVector<T, N>`] with explicit logical sizes. Column-major
//!   stack storage, no heap.
//!
//! - [`linalg`] — Cholesky factorization, triangular solves and inverses,
//!   used for decorrelation and the least-squares fallback.
//!
//! - [`traits`] — Element trait hierarchy:
//!   - [`Scalar`] — all container elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`] — real floats (`Scalar + Float`), used by the factorizations
//!   - [`MatrixRef`] / [`MatrixMut`] — generic read/write access for algorithms
//!
//! ## Capacity
//!
//! | Constant | Value | Meaning |
//! |---|---|---|
//! | [`MAX_SATS`] | 15 | tracked satellites, reference included |
//! | [`MAX_STATE_DIM`] | 21 | 3 position + 3 velocity + `MAX_SATS - 1` ambiguities |
//! | [`MAX_OBS_DIM`] | 30 | phase and code double differences |
//!
//! ## Logging
//!
//! Uses the [`log`](https://docs.rs/log) facade: `debug` when a configuration
//! is built, `trace` per epoch, `warn` when an epoch is aborted. No logger is
//! installed by the library.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | `std::error::Error` impls. Hardware FPU via system libm |
//! | `libm`  | baseline | Pure-Rust software float fallback |
//! | `serde` | no       | `Serialize`/`Deserialize` for parameters and GNSS inputs |

#![cfg_attr(not(feature = "std"), no_std)]

pub mod gnss;
pub mod kf;
pub mod linalg;
pub mod matrix;
pub mod traits;
pub mod ud;

pub use gnss::{Almanac, AlmanacEpoch, GpsTime, SatellitePositions, SingleDifference};
pub use kf::{
    get_kf, get_kf_from_alms, least_squares_solve, make_measurements, FilterParams,
    FilterState, KfConfig, KfError, SatelliteSet, MAX_OBS_DIM, MAX_SATS, MAX_STATE_DIM,
};
pub use matrix::{BoundedMatrix, BoundedVector};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
pub use ud::{UdError, UdFactors};
