//! Askama templates for the arrival pages.

use askama::Template;

use crate::board::RouteGroups;

/// Flat board: the message list as a JSON dump in `#output`.
#[derive(Template)]
#[template(path = "arrivals.html")]
pub struct ArrivalListTemplate {
    pub stop_name: String,
    /// Pretty-printed JSON array of messages
    pub output: String,
}

/// Grouped board. `None` means the upstream fetch failed.
#[derive(Template)]
#[template(path = "route_groups.html")]
pub struct RouteGroupsTemplate {
    pub stop_name: String,
    pub groups: Option<RouteGroups>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}
