use std::{future::Future, rc::Rc};

use thiserror::Error;

use crate::entities::search::SearchOption;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Geocoding request failed: {0}")]
    Fetch(String),
    #[error("Unexpected geocoding response: {0}")]
    Response(String),
}

pub trait GeocodingGateway {
    /// Resolves a free text query into candidate places.
    ///
    /// The options keep the order of the service's response.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchOption>, GeocodingError>>;
}

impl<G> GeocodingGateway for Rc<G>
where
    G: GeocodingGateway,
{
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchOption>, GeocodingError>> {
        (**self).search(query)
    }
}
