use num_traits::Float;

/// Seconds in one GPS week.
pub const WEEK_SECS: f64 = 604_800.0;

/// GPS system time: week number plus seconds into the week.
///
/// ```
/// use rtk_float::GpsTime;
///
/// let a = GpsTime::new(1800, 604_790.0);
/// let b = GpsTime::new(1801, 10.0);
/// assert_eq!(b.seconds_since(&a), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsTime {
    /// Week number.
    pub wn: i16,
    /// Time of week [s].
    pub tow: f64,
}

impl GpsTime {
    pub fn new(wn: i16, tow: f64) -> Self {
        Self { wn, tow }
    }

    /// Signed elapsed time `self - earlier` in seconds, across week
    /// boundaries.
    pub fn seconds_since(&self, earlier: &GpsTime) -> f64 {
        let weeks = i32::from(self.wn) - i32::from(earlier.wn);
        f64::from(weeks) * WEEK_SECS + (self.tow - earlier.tow)
    }

    /// Fold `tow` into `[0, WEEK_SECS)`, carrying whole weeks into `wn`.
    ///
    /// Returned unchanged when `tow` is not finite or the carried week
    /// number would leave the `i16` range; [`seconds_since`](Self::seconds_since)
    /// still measures such a time correctly.
    pub fn normalized(self) -> Self {
        if !self.tow.is_finite() {
            return self;
        }
        let mut weeks = Float::floor(self.tow / WEEK_SECS);
        let mut tow = self.tow - weeks * WEEK_SECS;
        // rounding can land exactly on the upper bound
        if tow >= WEEK_SECS {
            tow -= WEEK_SECS;
            weeks += 1.0;
        }
        let wn = f64::from(self.wn) + weeks;
        if wn < f64::from(i16::MIN) || wn > f64::from(i16::MAX) {
            return self;
        }
        Self { wn: wn as i16, tow }
    }

    /// The time `secs` seconds later, normalized.
    pub fn add_seconds(self, secs: f64) -> Self {
        Self::new(self.wn, self.tow + secs).normalized()
    }
}
