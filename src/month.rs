use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use chrono::{naive::NaiveDate, Datelike};

/// A single remote directory and manifest pair, addressed by year and month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPartition {
    year: i32,
    month: u32,
}

impl MonthPartition {
    pub const fn new(year: i32, month: u32) -> Self {
        debug_assert!(month >= 1 && month <= 12);
        Self { year, month }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Every partition from the one holding `start` through the one holding `end`.
    pub fn spanning(start: NaiveDate, end: NaiveDate) -> Vec<Self> {
        let last = Self::containing(end);
        let mut months = vec![];
        let mut curr = Self::containing(start);
        while curr <= last {
            months.push(curr);
            curr = curr.next();
        }
        months
    }

    /// Path of this month's directory relative to the remote base, e.g. `2013/2013-04/`.
    pub fn remote_dir(&self) -> String {
        format!("{:04}/{:04}-{:02}/", self.year, self.year, self.month)
    }

    /// Local directory `<root>/<YYYY>/<MM>`.
    pub fn local_dir(&self, root: &Path) -> PathBuf {
        let mut pth = PathBuf::new();
        pth.push(root);
        pth.push(format!("{:04}", self.year));
        pth.push(format!("{:02}", self.month));
        pth
    }
}

impl Display for MonthPartition {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
