//! Constant lookup tables shared by the date mapper, the leet translator and
//! the mask generator.
//!
//! All tables are plain `static` data: read-only, process-wide, and safe to
//! read from any number of threads.

/// Season names, indexed by [`crate::date::Season::index`]
/// (spring, summer, autumn, winter).
pub static GERMAN_SEASONS: [&str; 4] = ["Frühling", "Sommer", "Herbst", "Winter"];
pub static AMERICAN_SEASONS: [&str; 4] = ["Spring", "Summer", "Fall", "Winter"];
pub static BRITISH_SEASONS: [&str; 4] = ["Spring", "Summer", "Autumn", "Winter"];

/// Month names, indexed by zero-based month.
pub static GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

pub static ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Leet substitutions keyed by upper-case letter: e:3, o:0, i:1, a:4
pub static LEET_BASIC: [(char, &str); 4] = [('E', "3"), ('O', "0"), ('I', "1"), ('A', "4")];

/// Leet substitutions keyed by upper-case letter: e:3, o:0, i:1, a:@, t:7
pub static LEET_BASIC_PLUS: [(char, &str); 5] = [
    ('E', "3"),
    ('O', "0"),
    ('I', "1"),
    ('A', "@"),
    ('T', "7"),
];

/// Attribute holding the raw password-change timestamp
pub const PWD_LAST_SET: &str = "pwdLastSet";

/// Attribute used as the username of a generated combo
pub const USERNAME_ATTRIBUTE: &str = "sAMAccountName";

/// Attributes requested from the directory and listed for each record
pub static DEFAULT_ATTRIBUTES: [&str; 11] = [
    "cn",
    "sn",
    "givenName",
    PWD_LAST_SET,
    USERNAME_ATTRIBUTE,
    "userPrincipalName",
    "description",
    "info",
    "department",
    "l",
    "postalCode",
];

/// `[NUMBER]` slot values for the mask generator
pub static NUMBER_TOKENS: [&str; 7] = ["{YY}", "{YYYY}", "1", "2", "3", "12", "123"];

/// `[SPECIAL]` slot values for the mask generator
pub static SPECIAL_TOKENS: [&str; 5] = ["!", ".", "#", "-", "_"];

/// Built-in `[WORD]` slot values, appended after any user-supplied nouns
pub static NOUN_TOKENS: [&str; 4] = ["{MonthGerman}", "{SeasonGerman}", "{sn}", "{givenName}"];
