//! Store front, genre and pricing catalog.
//!
//! The cartesian product of these three tables drives the update task
//! list. The built-in tables cover every store front and genre the feed
//! serves; deployments can override them from `config.toml`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An App Store store front (one per country).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreFront {
    /// Numeric store front identifier used in the feed URL
    pub id: u32,

    /// ISO 3166-1 alpha-2 country code, lowercase
    pub country_code: String,
}

/// An application genre (chart category).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    /// Numeric genre identifier used in the feed URL
    pub id: u32,

    /// Snake-case genre name used in storage paths and positions
    pub name: String,
}

/// Chart pricing tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Pricing {
    Paid,
    Free,
}

impl Pricing {
    /// Feed URL segment and storage path segment for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pricing::Paid => "paid",
            Pricing::Free => "free",
        }
    }

    /// Parse from the lowercase string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(Pricing::Paid),
            "free" => Some(Pricing::Free),
            _ => None,
        }
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All store fronts served by the feed, as (id, country code) pairs.
const STORE_FRONTS: &[(u32, &str)] = &[
    (143505, "ar"), // Argentina
    (143460, "au"), // Australia
    (143445, "at"), // Austria
    (143446, "be"), // Belgium
    (143503, "br"), // Brazil
    (143455, "ca"), // Canada
    (143483, "cl"), // Chile
    (143465, "cn"), // China
    (143501, "co"), // Colombia
    (143495, "cr"), // Costa Rica
    (143494, "hr"), // Croatia
    (143489, "cz"), // Czech Republic
    (143458, "dk"), // Denmark
    (143508, "do"), // Dominican Rep.
    (143509, "ec"), // Ecuador
    (143516, "eg"), // Egypt
    (143506, "sv"), // El Salvador
    (143518, "ee"), // Estonia
    (143447, "fi"), // Finland
    (143442, "fr"), // France
    (143443, "de"), // Germany
    (143448, "gr"), // Greece
    (143504, "gt"), // Guatemala
    (143510, "hn"), // Honduras
    (143463, "hk"), // Hong Kong
    (143482, "hu"), // Hungary
    (143467, "in"), // India
    (143476, "id"), // Indonesia
    (143449, "ie"), // Ireland
    (143491, "il"), // Israel
    (143450, "it"), // Italy
    (143511, "jm"), // Jamaica
    (143462, "jp"), // Japan
    (143517, "kz"), // Kazakstan
    (143466, "kr"), // Korea, Republic Of
    (143493, "kw"), // Kuwait
    (143519, "lv"), // Latvia
    (143497, "lb"), // Lebanon
    (143520, "lt"), // Lithuania
    (143451, "lu"), // Luxembourg
    (143515, "mo"), // Macau
    (143473, "my"), // Malaysia
    (143521, "mt"), // Malta
    (143468, "mx"), // Mexico
    (143523, "md"), // Moldova, Republic Of
    (143452, "nl"), // Netherlands
    (143461, "nz"), // New Zealand
    (143512, "ni"), // Nicaragua
    (143457, "no"), // Norway
    (143477, "pk"), // Pakistan
    (143485, "pa"), // Panama
    (143513, "py"), // Paraguay
    (143507, "pe"), // Peru
    (143474, "ph"), // Philippines
    (143478, "pl"), // Poland
    (143453, "pt"), // Portugal
    (143498, "qa"), // Qatar
    (143487, "ro"), // Romania
    (143469, "ru"), // Russia
    (143479, "sa"), // Saudi Arabia
    (143464, "sg"), // Singapore
    (143496, "sk"), // Slovakia
    (143499, "si"), // Slovenia
    (143472, "za"), // South Africa
    (143454, "es"), // Spain
    (143486, "lk"), // Sri Lanka
    (143456, "se"), // Sweden
    (143459, "ch"), // Switzerland
    (143470, "tw"), // Taiwan
    (143475, "th"), // Thailand
    (143480, "tr"), // Turkey
    (143481, "ae"), // United Arab Emirates
    (143444, "gb"), // United Kingdom
    (143441, "us"), // United States
    (143514, "uy"), // Uruguay
    (143502, "ve"), // Venezuela
    (143471, "vn"), // Vietnam
];

/// All chart genres, as (id, name) pairs.
const GENRES: &[(u32, &str)] = &[
    (6000, "business"),
    (6001, "weather"),
    (6002, "utilities"),
    (6003, "travel"),
    (6004, "sports"),
    (6005, "social_networking"),
    (6006, "reference"),
    (6007, "productivity"),
    (6008, "photo_and_video"),
    (6009, "news"),
    (6010, "navigation"),
    (6011, "music"),
    (6012, "lifestyle"),
    (6013, "health_and_fitness"),
    (6014, "games"),
    (6015, "finance"),
    (6016, "entertainment"),
    (6017, "education"),
    (6018, "book"),
    (6020, "medical"),
    (6021, "magazine_and_newspapers"),
    (6022, "catalogs"),
    (6023, "food_and_drink"),
    (6024, "shopping"),
    (6025, "stickers"),
    (6026, "developer_tools"),
    (6027, "graphics_and_design"),
];

/// Built-in store front table.
pub fn default_store_fronts() -> Vec<StoreFront> {
    STORE_FRONTS
        .iter()
        .map(|(id, code)| StoreFront {
            id: *id,
            country_code: (*code).to_string(),
        })
        .collect()
}

/// Built-in genre table.
pub fn default_genres() -> Vec<Genre> {
    GENRES
        .iter()
        .map(|(id, name)| Genre {
            id: *id,
            name: (*name).to_string(),
        })
        .collect()
}

/// Built-in pricing tiers.
pub fn default_pricings() -> Vec<Pricing> {
    vec![Pricing::Paid, Pricing::Free]
}
