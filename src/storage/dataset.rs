use std::fmt;
use std::path::PathBuf;

/// Every durable dataset the bot keeps.
///
/// Adding a variant forces a file name in [`Dataset::file_name`], so no
/// dataset can be loaded or saved without a registered path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Owner, admins, users and blacklist
    Users,
    /// Per-user summon lists
    Summons,
    /// Currency accounts
    Currency,
    /// Birthdays in `DD-MM` form
    Birthdays,
    /// Shop prices
    Shop,
    /// Loot tables
    LootTables,
}

impl Dataset {
    /// All datasets, in startup load order
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Summons,
        Self::Currency,
        Self::Birthdays,
        Self::Shop,
        Self::LootTables,
    ];

    /// File name under the data directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Users => "user_ids.json",
            Self::Summons => "summons.json",
            Self::Currency => "currency.json",
            Self::Birthdays => "birthdays.json",
            Self::Shop => "shop.json",
            Self::LootTables => "loottables.json",
        }
    }

    /// Position in [`Dataset::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Users => "users",
            Self::Summons => "summons",
            Self::Currency => "currency",
            Self::Birthdays => "birthdays",
            Self::Shop => "shop",
            Self::LootTables => "loot_tables",
        };
        f.write_str(name)
    }
}

/// Resolves datasets to paths below a root directory
#[derive(Clone, Debug)]
pub struct DataFiles {
    root: PathBuf,
}

impl DataFiles {
    /// Creates a mapping rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of the dataset's JSON file
    #[must_use]
    pub fn path(&self, dataset: Dataset) -> PathBuf {
        self.root.join(dataset.file_name())
    }
}
