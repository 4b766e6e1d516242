use crate::{Error, WeatherObservation};

/// Weather needs no aggregation; this only guarantees ascending date order.
pub fn transform_weather(
    mut observations: Vec<WeatherObservation>,
) -> Result<Vec<WeatherObservation>, Error> {
    if observations.is_empty() {
        return Err(Error::EmptyInput("weather"));
    }
    observations.sort_by_key(|obs| obs.date);
    Ok(observations)
}
