pub mod booking;
pub mod error;
pub mod poll;
pub mod schedule;
pub mod web;
