pub mod scouting;
