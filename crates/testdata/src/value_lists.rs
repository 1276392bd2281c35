//! Categorical value pools for person synthesis.
//!
//! Pools are loaded once per run from line-delimited UTF-8 text, one value
//! per line, and are read-only afterwards. Values are stored exactly as read;
//! surrounding whitespace is trimmed when a value is drawn.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{ConfigurationError, PoolKind};

const BUNDLED_MALE: &str = include_str!("../resources/male.txt");
const BUNDLED_FEMALE: &str = include_str!("../resources/female.txt");
const BUNDLED_SURNAMES: &str = include_str!("../resources/surnames.txt");
const BUNDLED_EYE_COLORS: &str = include_str!("../resources/eyecolors.txt");

/// An ordered pool of values drawn from uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueList(Vec<String>);

impl ValueList {
    /// Splits line-delimited text into a pool, one entry per line.
    ///
    /// # Example
    ///
    /// ```
    /// use testdata::ValueList;
    ///
    /// let list = ValueList::from_lines("Anna\nLena \r\nMia\n");
    /// assert_eq!(list.len(), 3);
    /// ```
    #[must_use]
    pub fn from_lines(text: &str) -> Self {
        Self(text.lines().map(str::to_owned).collect())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the pool has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Draws one entry uniformly, trimmed of surrounding whitespace.
    ///
    /// Returns `None` for an empty pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.0.choose(rng).map(|value| value.trim())
    }
}

impl<S: Into<String>> FromIterator<S> for ValueList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// The four value pools needed to synthesise a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePools {
    male_names: ValueList,
    female_names: ValueList,
    surnames: ValueList,
    eye_colors: ValueList,
}

impl ValuePools {
    /// Assembles pools from already-loaded lists.
    #[must_use]
    pub const fn new(
        male_names: ValueList,
        female_names: ValueList,
        surnames: ValueList,
        eye_colors: ValueList,
    ) -> Self {
        Self {
            male_names,
            female_names,
            surnames,
            eye_colors,
        }
    }

    /// Returns the pools compiled into the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(
            ValueList::from_lines(BUNDLED_MALE),
            ValueList::from_lines(BUNDLED_FEMALE),
            ValueList::from_lines(BUNDLED_SURNAMES),
            ValueList::from_lines(BUNDLED_EYE_COLORS),
        )
    }

    /// Loads all four pools from `male.txt`, `female.txt`, `surnames.txt`
    /// and `eyecolors.txt` inside the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ValueListRead`] if the directory or one
    /// of its files cannot be read.
    pub fn open(path: &Utf8Path) -> Result<Self, ConfigurationError> {
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| {
            ConfigurationError::ValueListRead {
                path: path.as_std_path().to_path_buf(),
                message: err.to_string(),
            }
        })?;
        Self::load(&dir, path)
    }

    fn load(dir: &Dir, root: &Utf8Path) -> Result<Self, ConfigurationError> {
        Ok(Self::new(
            read_list(dir, root, PoolKind::MaleNames)?,
            read_list(dir, root, PoolKind::FemaleNames)?,
            read_list(dir, root, PoolKind::Surnames)?,
            read_list(dir, root, PoolKind::EyeColors)?,
        ))
    }

    /// Checks that every pool has at least one entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyPool`] naming the first empty pool.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for kind in [
            PoolKind::MaleNames,
            PoolKind::FemaleNames,
            PoolKind::Surnames,
            PoolKind::EyeColors,
        ] {
            if self.pool(kind).is_empty() {
                return Err(ConfigurationError::EmptyPool { pool: kind });
            }
        }
        Ok(())
    }

    /// Returns the pool of the given kind.
    #[must_use]
    pub const fn pool(&self, kind: PoolKind) -> &ValueList {
        match kind {
            PoolKind::MaleNames => &self.male_names,
            PoolKind::FemaleNames => &self.female_names,
            PoolKind::Surnames => &self.surnames,
            PoolKind::EyeColors => &self.eye_colors,
        }
    }
}

fn read_list(dir: &Dir, root: &Utf8Path, kind: PoolKind) -> Result<ValueList, ConfigurationError> {
    let file_name = kind.file_name();
    let text = dir
        .read_to_string(file_name)
        .map_err(|err| ConfigurationError::ValueListRead {
            path: root.join(file_name).into_std_path_buf(),
            message: err.to_string(),
        })?;
    Ok(ValueList::from_lines(&text))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    #[test]
    fn bundled_pools_are_populated() {
        let pools = ValuePools::bundled();
        assert_eq!(pools.validate(), Ok(()));
    }

    #[test]
    fn lines_are_kept_verbatim() {
        let list = ValueList::from_lines(" Anna \nLena");
        assert_eq!(list, ValueList::from_iter([" Anna ", "Lena"]));
    }

    #[test]
    fn choose_trims_whitespace() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let list = ValueList::from_lines("  Clara\t");
        assert_eq!(list.choose(&mut rng), Some("Clara"));
    }

    #[test]
    fn choose_on_empty_pool_returns_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(ValueList::default().choose(&mut rng), None);
    }

    #[rstest]
    #[case::male(PoolKind::MaleNames)]
    #[case::female(PoolKind::FemaleNames)]
    #[case::surnames(PoolKind::Surnames)]
    #[case::eye_colors(PoolKind::EyeColors)]
    fn validate_names_the_empty_pool(#[case] empty: PoolKind) {
        let list_for = |kind: PoolKind| {
            if kind == empty {
                ValueList::default()
            } else {
                ValueList::from_iter(["value"])
            }
        };
        let pools = ValuePools::new(
            list_for(PoolKind::MaleNames),
            list_for(PoolKind::FemaleNames),
            list_for(PoolKind::Surnames),
            list_for(PoolKind::EyeColors),
        );

        assert_eq!(
            pools.validate(),
            Err(ConfigurationError::EmptyPool { pool: empty })
        );
    }

    #[test]
    fn open_reports_missing_directory() {
        let result = ValuePools::open(Utf8Path::new("target/does-not-exist/value-lists"));
        assert!(matches!(
            result,
            Err(ConfigurationError::ValueListRead { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported_with_its_directory() {
        let dir = Utf8Path::new("target/testdata-unit/partial-value-lists");
        let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open cwd");
        root.create_dir_all(dir).expect("create list dir");
        root.write(dir.join("male.txt"), "Lukas\n").expect("write male names");

        let err = ValuePools::open(dir).expect_err("female names are missing");

        let expected = dir.join("female.txt").into_std_path_buf();
        assert!(matches!(
            err,
            ConfigurationError::ValueListRead { ref path, .. } if *path == expected
        ));
    }
}
