//! URL handling module for the harvester
//!
//! This module builds the start URL and turns the three kinds of `href`
//! found on extranet pages into absolute visit targets.

mod resolve;

pub use resolve::{
    build_start_url, resolve_against_origin, resolve_against_page, resolve_folder_link,
};
