#![allow(missing_docs)]

pub(crate) mod http;
pub(crate) mod state;

pub(crate) use http::{assert_content_type, json_body};
pub(crate) use state::{TEST_NOW, must_create_store_state};
