//! Navigation targets for search results.

use dadar_core::{SearchResult, SourceType};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub id: String,
    pub title: String,
}

/// A detail-screen route: a path template plus the values substituted into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Template with an `[id]` placeholder, e.g. `/hotel/[id]`.
    pub pathname: &'static str,
    pub params: RouteParams,
}

impl Route {
    /// Concrete link: `[id]` substituted and the title passed as a query parameter.
    #[must_use]
    pub fn href(&self) -> String {
        let id = utf8_percent_encode(&self.params.id, NON_ALPHANUMERIC).to_string();
        let title = utf8_percent_encode(&self.params.title, NON_ALPHANUMERIC);
        format!("{}?title={title}", self.pathname.replace("[id]", &id))
    }
}

/// Receives navigation requests. Fire-and-forget.
pub trait Navigator {
    fn navigate(&self, route: &Route);
}

#[must_use]
pub fn route_template(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Hotel => "/hotel/[id]",
        SourceType::Shop => "/shop/[id]",
        SourceType::Place => "/place/[id]",
        SourceType::Event => "/event/[id]",
        SourceType::News => "/news/[id]",
        SourceType::Blog => "/blog/[id]",
    }
}

#[must_use]
pub fn route_for(result: &SearchResult) -> Route {
    Route {
        pathname: route_template(result.source_type),
        params: RouteParams {
            id: result.id.clone(),
            title: result.title.clone(),
        },
    }
}

/// Navigate to the detail screen for a result.
pub fn dispatch<N: Navigator + ?Sized>(result: &SearchResult, navigator: &N) {
    navigator.navigate(&route_for(result));
}

/// Navigate using a type tag that has not been validated yet.
///
/// An unrecognised tag is ignored. Returns whether navigation happened.
pub fn dispatch_tagged<N: Navigator + ?Sized>(
    type_tag: &str,
    id: &str,
    title: &str,
    navigator: &N,
) -> bool {
    let Ok(source_type) = type_tag.parse::<SourceType>() else {
        tracing::debug!(type_tag, "no route for result type; ignoring");
        return false;
    };
    navigator.navigate(&Route {
        pathname: route_template(source_type),
        params: RouteParams {
            id: id.to_string(),
            title: title.to_string(),
        },
    });
    true
}

/// Shareable link for a submitted query.
#[must_use]
pub fn share_link(query: &str) -> String {
    format!(
        "/search?q={}",
        utf8_percent_encode(query, NON_ALPHANUMERIC)
    )
}
