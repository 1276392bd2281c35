//! Rejection-sampling primitives for ages, heights and birth dates.
//!
//! Draws come from a normal distribution and are rejected until one falls
//! inside the inclusive bounds. There is no iteration cap; the fixed
//! parameters below keep the acceptance probability high.

use chrono::NaiveDate;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::ConfigurationError;
use crate::person::Gender;

/// Offset added to a male height after the bounded draw.
const MALE_HEIGHT_OFFSET_CM: f64 = 10.0;

/// Months in the year, used for the uniform month draw.
const MONTHS: u32 = 12;

/// A normal distribution truncated to `[low, high]` by rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedGaussian {
    mean: f64,
    std_dev: f64,
    low: f64,
    high: f64,
}

impl BoundedGaussian {
    /// Ages in years: mean 45, standard deviation 22, bounds 1 to 100.
    pub const AGE: Self = Self {
        mean: 45.0,
        std_dev: 22.0,
        low: 1.0,
        high: 100.0,
    };

    /// Heights in centimetres before any gender offset: mean 165, standard
    /// deviation 10, bounds 150 to 190.
    pub const HEIGHT: Self = Self {
        mean: 165.0,
        std_dev: 10.0,
        low: 150.0,
        high: 190.0,
    };

    /// Validates and builds a bounded distribution.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidDistribution`] when a parameter is
    /// not finite, the standard deviation is not positive, or `low > high`.
    pub fn new(mean: f64, std_dev: f64, low: f64, high: f64) -> Result<Self, ConfigurationError> {
        if ![mean, std_dev, low, high].iter().all(|value| value.is_finite()) {
            return Err(ConfigurationError::InvalidDistribution {
                message: "parameters must be finite".to_owned(),
            });
        }
        if std_dev <= 0.0 {
            return Err(ConfigurationError::InvalidDistribution {
                message: format!("standard deviation must be positive, got {std_dev}"),
            });
        }
        if low > high {
            return Err(ConfigurationError::InvalidDistribution {
                message: format!("lower bound {low} exceeds upper bound {high}"),
            });
        }
        Ok(Self {
            mean,
            std_dev,
            low,
            high,
        })
    }

    /// Draws until a value lands inside the inclusive bounds.
    #[expect(
        clippy::float_arithmetic,
        reason = "scaling a standard normal draw is inherently floating point"
    )]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let z: f64 = rng.sample(StandardNormal);
            let candidate = z * self.std_dev + self.mean;
            if (self.low..=self.high).contains(&candidate) {
                return candidate;
            }
        }
    }
}

/// Sampling operations over one explicitly owned random source.
///
/// The generator is seeded once by the caller and reused for every draw.
#[derive(Debug, Clone)]
pub struct ConstrainedSampler<R> {
    rng: R,
}

impl<R: Rng> ConstrainedSampler<R> {
    /// Wraps an already-seeded generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Gives mutable access to the underlying generator.
    pub const fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Draws from `distribution`.
    pub fn bounded_gaussian(&mut self, distribution: &BoundedGaussian) -> f64 {
        distribution.sample(&mut self.rng)
    }

    /// Draws an age in years from [`BoundedGaussian::AGE`].
    pub fn random_age(&mut self) -> f64 {
        self.bounded_gaussian(&BoundedGaussian::AGE)
    }

    /// Draws a height in whole centimetres.
    ///
    /// The bounded draw happens first and the male offset is added after it,
    /// so female heights lie in 150 to 190 and male heights in 160 to 200.
    #[expect(
        clippy::float_arithmetic,
        reason = "the gender offset is applied to the floating point draw"
    )]
    pub fn random_height(&mut self, gender: Gender) -> u16 {
        let mut height = self.bounded_gaussian(&BoundedGaussian::HEIGHT);
        if gender == Gender::Male {
            height += MALE_HEIGHT_OFFSET_CM;
        }
        round_to_u16(height)
    }

    /// Draws a birth date `round(age)` years before `reference_year`.
    ///
    /// Month is uniform over 1 to 12 and the day is uniform over 31, 30 or
    /// 28 days depending on the month. February never has a 29th.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidReferenceYear`] when the resulting
    /// year is outside the supported calendar range.
    pub fn random_birth_date(&mut self, reference_year: i32) -> Result<NaiveDate, ConfigurationError> {
        let age = self.random_age();
        let month = self.rng.random_range(1..=MONTHS);
        let day = self.rng.random_range(1..=days_in_month(month));
        let year = reference_year
            .checked_sub(round_to_i32(age))
            .ok_or(ConfigurationError::InvalidReferenceYear {
                year: reference_year,
            })?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or(ConfigurationError::InvalidReferenceYear {
            year: reference_year,
        })
    }
}

/// Day count per month without leap-year adjustment.
const fn days_in_month(month: u32) -> u32 {
    match month {
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "heights are bounded to 150..=200 before the cast"
)]
fn round_to_u16(value: f64) -> u16 {
    value.round() as u16
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "ages are bounded to 1..=100 before the cast"
)]
fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;

    const DRAWS: usize = 5_000;

    #[fixture]
    fn sampler() -> ConstrainedSampler<ChaCha8Rng> {
        ConstrainedSampler::new(ChaCha8Rng::seed_from_u64(2018))
    }

    #[rstest]
    fn ages_stay_within_bounds(mut sampler: ConstrainedSampler<ChaCha8Rng>) {
        for _ in 0..DRAWS {
            let age = sampler.random_age();
            assert!((1.0..=100.0).contains(&age), "age out of range: {age}");
        }
    }

    #[rstest]
    #[case::female(Gender::Female, 150, 190)]
    #[case::male(Gender::Male, 160, 200)]
    fn heights_stay_within_gender_range(
        mut sampler: ConstrainedSampler<ChaCha8Rng>,
        #[case] gender: Gender,
        #[case] low: u16,
        #[case] high: u16,
    ) {
        for _ in 0..DRAWS {
            let height = sampler.random_height(gender);
            assert!(
                (low..=high).contains(&height),
                "{gender} height out of range: {height}"
            );
        }
    }

    #[rstest]
    fn male_heights_exceed_the_unshifted_upper_bound(mut sampler: ConstrainedSampler<ChaCha8Rng>) {
        let tallest = (0..DRAWS)
            .map(|_| sampler.random_height(Gender::Male))
            .max()
            .unwrap_or_default();
        assert!(tallest > 190, "male offset should not be re-clamped");
    }

    #[rstest]
    fn birth_dates_never_fall_on_february_29(mut sampler: ConstrainedSampler<ChaCha8Rng>) {
        for _ in 0..DRAWS {
            let date = sampler.random_birth_date(2024).expect("valid date");
            assert!(!(date.month() == 2 && date.day() == 29), "{date}");
        }
    }

    #[rstest]
    fn birth_years_follow_rounded_age(mut sampler: ConstrainedSampler<ChaCha8Rng>) {
        for _ in 0..DRAWS {
            let date = sampler.random_birth_date(2020).expect("valid date");
            assert!((1920..=2019).contains(&date.year()), "{date}");
        }
    }

    #[rstest]
    fn every_month_is_reachable(mut sampler: ConstrainedSampler<ChaCha8Rng>) {
        let mut seen = [false; 12];
        for _ in 0..DRAWS {
            let date = sampler.random_birth_date(2020).expect("valid date");
            if let Some(slot) = seen.get_mut(date.month0() as usize) {
                *slot = true;
            }
        }
        assert!(seen.iter().all(|hit| *hit), "months seen: {seen:?}");
    }

    #[test]
    fn same_seed_gives_same_draws() {
        let mut first = ConstrainedSampler::new(ChaCha8Rng::seed_from_u64(9));
        let mut second = ConstrainedSampler::new(ChaCha8Rng::seed_from_u64(9));
        for _ in 0..100 {
            assert_eq!(first.random_height(Gender::Female), second.random_height(Gender::Female));
        }
    }

    #[test]
    fn extreme_reference_year_is_rejected() {
        let mut sampler = ConstrainedSampler::new(ChaCha8Rng::seed_from_u64(1));
        assert_eq!(
            sampler.random_birth_date(i32::MIN),
            Err(ConfigurationError::InvalidReferenceYear { year: i32::MIN })
        );
    }

    #[rstest]
    #[case::non_finite(f64::NAN, 1.0, 0.0, 1.0)]
    #[case::zero_std_dev(0.0, 0.0, 0.0, 1.0)]
    #[case::inverted_bounds(0.0, 1.0, 2.0, 1.0)]
    fn rejects_unusable_parameters(
        #[case] mean: f64,
        #[case] std_dev: f64,
        #[case] low: f64,
        #[case] high: f64,
    ) {
        assert!(matches!(
            BoundedGaussian::new(mean, std_dev, low, high),
            Err(ConfigurationError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn custom_distribution_respects_bounds() {
        let distribution = BoundedGaussian::new(0.0, 1.0, -0.5, 0.5).expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..DRAWS {
            let value = distribution.sample(&mut rng);
            assert!((-0.5..=0.5).contains(&value));
        }
    }
}
