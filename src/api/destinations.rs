//! Destinations API endpoints
//!
//! Everything related to the destinations management

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use crate::destinations::Destination;
use crate::destinations::DestinationRow;
use crate::storage::CreateDestinationValues;
use crate::storage::ListingQuery;
use crate::storage::Pagination;
use crate::storage::SidebarFilters;
use crate::storage::Storage;
use crate::storage::UpdateDestinationValues;

use super::Acknowledgement;
use super::Error;
use super::Form;
use super::QueryParameters;
use super::Success;
use super::request::deserialize_flag;
use super::request::deserialize_id;
use super::request::deserialize_positive;
use super::request::required;
use super::request::required_id;

/// Sidebar filters in a JSON body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SidebarFiltersForm {
    destination_name: Option<String>,
    description: Option<String>,
    country: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Listing request as JSON body
///
/// Invalid `page`/`perPage` values fall back to the defaults
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListingForm {
    #[serde(default)]
    search: Option<String>,

    #[serde(default, deserialize_with = "deserialize_positive")]
    page: Option<u64>,

    #[serde(default, deserialize_with = "deserialize_positive")]
    per_page: Option<u64>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    count_only: bool,

    #[serde(default)]
    sidebar_filters: Option<SidebarFiltersForm>,
}

impl From<ListingForm> for ListingQuery {
    fn from(form: ListingForm) -> Self {
        let filters = form.sidebar_filters.unwrap_or_default();

        Self {
            search: form.search.unwrap_or_default(),
            sidebar_filters: SidebarFilters {
                destination_name: filters.destination_name,
                description: filters.description,
                country: filters.country,
                kind: filters.kind,
            },
            pagination: Pagination::new(form.page, form.per_page),
            count_only: form.count_only,
        }
    }
}

/// Listing request as query string
///
/// Sidebar filters use bracket keys: `sidebarFilters[destinationName]=...`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingParameters {
    #[serde(default)]
    search: Option<String>,

    #[serde(default, deserialize_with = "deserialize_positive")]
    page: Option<u64>,

    #[serde(default, rename = "perPage", deserialize_with = "deserialize_positive")]
    per_page: Option<u64>,

    #[serde(default, rename = "countOnly", deserialize_with = "deserialize_flag")]
    count_only: bool,

    #[serde(default, rename = "sidebarFilters[destinationName]")]
    destination_name: Option<String>,

    #[serde(default, rename = "sidebarFilters[description]")]
    description: Option<String>,

    #[serde(default, rename = "sidebarFilters[country]")]
    country: Option<String>,

    #[serde(default, rename = "sidebarFilters[type]")]
    kind: Option<String>,
}

impl From<ListingParameters> for ListingQuery {
    fn from(parameters: ListingParameters) -> Self {
        Self {
            search: parameters.search.unwrap_or_default(),
            sidebar_filters: SidebarFilters {
                destination_name: parameters.destination_name,
                description: parameters.description,
                country: parameters.country,
                kind: parameters.kind,
            },
            pagination: Pagination::new(parameters.page, parameters.per_page),
            count_only: parameters.count_only,
        }
    }
}

/// Either the rows of a page, or the number of matching rows
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListingResponse {
    /// Destinations on the requested page
    Rows(Vec<DestinationRow>),

    /// Count mode
    Count { total_records: i64 },
}

/// List destinations, filters in the query string
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:3000/destinations?search=beach&page=2&perPage=10'
/// ```
///
/// Response:
/// ```json
/// [ { "id": 1, "name": "Ibiza", "countrycode": "ES", "country": "Spain" ... } ]
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    QueryParameters(parameters): QueryParameters<ListingParameters>,
) -> Result<Success<ListingResponse>, Error> {
    respond_with_listing(&storage, parameters.into()).await
}

/// List destinations, filters in a JSON body
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "search": "beach", "sidebarFilters": { "country": "Spain--ES" }, "countOnly": true }' \
///     http://localhost:3000/destinations
/// ```
///
/// Response:
/// ```json
/// { "total_records": 12 }
/// ```
pub async fn search<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<ListingForm>,
) -> Result<Success<ListingResponse>, Error> {
    respond_with_listing(&storage, form.into()).await
}

async fn respond_with_listing<S: Storage>(
    storage: &S,
    listing: ListingQuery,
) -> Result<Success<ListingResponse>, Error> {
    if listing.count_only {
        let total_records = storage
            .count_destinations(&listing)
            .await
            .map_err(|err| Error::internal_server_error("Error in counting destinations", err))?;

        Ok(Success::ok(ListingResponse::Count { total_records }))
    } else {
        let destinations = storage
            .find_destinations(&listing)
            .await
            .map_err(|err| {
                Error::internal_server_error("Error in retrieving destination data", err)
            })?;

        Ok(Success::ok(ListingResponse::Rows(destinations)))
    }
}

/// Destination ID in the query string
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DestinationParameters {
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<i64>,
}

/// Get a single destination
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:3000/destination?id=1'
/// ```
///
/// Response, empty when not found:
/// ```json
/// [ { "id": 1, "name": "Ibiza" ... } ]
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    QueryParameters(parameters): QueryParameters<DestinationParameters>,
) -> Result<Success<Vec<Destination>>, Error> {
    let id = required_id(parameters.id)?;

    let destination = storage
        .find_destination_by_id(id)
        .await
        .map_err(|err| Error::internal_server_error("Error in retrieving destination", err))?;

    Ok(Success::ok(destination))
}

/// Create destination form
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateDestinationForm {
    name: Option<String>,
    description: Option<String>,
    country_code: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Create a destination based on the [`CreateDestinationForm`](CreateDestinationForm) form
///
/// All fields are required
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "name": "Ibiza", "description": "Island", "country_code": "ES", "type": "beach" }' \
///     http://localhost:3000/destinations/create
/// ```
///
/// Response:
/// ```json
/// { "Message": "Destination created", "id": 1 }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateDestinationForm>,
) -> Result<Success<Acknowledgement>, Error> {
    let values = CreateDestinationValues {
        name: required(form.name.as_ref())?,
        description: required(form.description.as_ref())?,
        country_code: required(form.country_code.as_ref())?,
        kind: required(form.kind.as_ref())?,
    };

    let id = storage
        .create_destination(&values)
        .await
        .map_err(|err| Error::internal_server_error("Error in creating destination", err))?;

    tracing::info!("Destination {id} created");

    Ok(Success::created(Acknowledgement {
        message: "Destination created",
        id,
    }))
}

/// Update destination form
///
/// All editable fields are overwritten, so all are required
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDestinationForm {
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    country_code: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Update a destination based on the [`UpdateDestinationForm`](UpdateDestinationForm) form
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -d '{ "id": 1, "name": "Ibiza", "description": "Island", "country_code": "ES", "type": "beach" }' \
///     http://localhost:3000/destinations/update
/// ```
///
/// Response:
/// ```json
/// { "Message": "Destination updated", "id": 1 }
/// ```
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<UpdateDestinationForm>,
) -> Result<Success<Acknowledgement>, Error> {
    let values = UpdateDestinationValues {
        id: required_id(form.id)?,
        name: required(form.name.as_ref())?,
        description: required(form.description.as_ref())?,
        country_code: required(form.country_code.as_ref())?,
        kind: required(form.kind.as_ref())?,
    };

    storage
        .update_destination(&values)
        .await
        .map_err(|err| Error::internal_server_error("Error in updating destination", err))?;

    tracing::info!("Destination {} updated", values.id);

    Ok(Success::ok(Acknowledgement {
        message: "Destination updated",
        id: values.id,
    }))
}

/// Delete destination form
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteDestinationForm {
    #[serde(default, deserialize_with = "deserialize_id")]
    id: Option<i64>,
}

/// Delete a destination, ID in a JSON body
///
/// Request:
/// ```sh
/// curl -v -XDELETE -H 'Content-Type: application/json' \
///     -d '{ "id": 1 }' \
///     http://localhost:3000/destinations/delete
/// ```
///
/// Response:
/// ```json
/// { "Message": "Destination deleted", "id": 1 }
/// ```
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<DeleteDestinationForm>,
) -> Result<Success<Acknowledgement>, Error> {
    delete_destination(&storage, form.id).await
}

/// Delete a destination, ID in the query string
///
/// Request:
/// ```sh
/// curl -v -XDELETE 'http://localhost:3000/destination?id=1'
/// ```
pub async fn delete_by_query<S: Storage>(
    Extension(storage): Extension<S>,
    QueryParameters(parameters): QueryParameters<DestinationParameters>,
) -> Result<Success<Acknowledgement>, Error> {
    delete_destination(&storage, parameters.id).await
}

async fn delete_destination<S: Storage>(
    storage: &S,
    id: Option<i64>,
) -> Result<Success<Acknowledgement>, Error> {
    let id = required_id(id)?;

    storage
        .delete_destination(id)
        .await
        .map_err(|err| Error::internal_server_error("Error in deleting destination", err))?;

    tracing::info!("Destination {id} deleted");

    Ok(Success::ok(Acknowledgement {
        message: "Destination deleted",
        id,
    }))
}
