//! Link lookup service client.

mod client;

pub use client::{LOOKUP_PATH, WhatslinkClient};
