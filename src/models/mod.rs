mod amal;
mod daily_note;
mod prayer_track;
mod reset_code;
mod user;

pub use amal::Amal;
pub use daily_note::DailyNote;
pub use prayer_track::PrayerTrack;
pub use reset_code::ResetCode;
pub use user::User;
