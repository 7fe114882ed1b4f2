pub mod amals;
pub mod daily_notes;
pub mod prayer_tracks;
pub mod reset_codes;
pub mod users;
