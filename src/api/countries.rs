//! Countries API endpoint
//!
//! The countries table is reference data, there is only a listing

use axum::Extension;

use crate::countries::Country;
use crate::storage::Storage;

use super::Error;
use super::Success;

/// List all countries, sorted by name
///
/// Request:
/// ```sh
/// curl -v http://localhost:3000/countries
/// ```
///
/// Response:
/// ```json
/// [ { "country": "Spain", "country_code": "ES" } ]
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Vec<Country>>, Error> {
    let countries = storage
        .find_all_countries()
        .await
        .map_err(|err| Error::internal_server_error("Error in retrieving countries", err))?;

    Ok(Success::ok(countries))
}
