use super::*;
use super::test_helpers::*;
use crate::error::Error;
use crate::types::{ListOptions, OrderId, OrderState};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
