//! Application use cases and transactions.

mod city;
mod country;
mod external;
mod user;
mod validate;

pub use city::{
    city_create, city_delete, city_get, city_list, city_list_by_country, city_update,
    CityCreateReq, CityDto, CityUpdateReq,
};
pub use country::{
    country_create, country_delete, country_get, country_list, country_update, CountryCreateReq,
    CountryDto, CountryUpdateReq,
};
pub use external::{
    country_info_from_json, weather_lookup, weather_simulated, CountryDirectory, CountryInfo,
    CountryLookupReq, WeatherInfo, WeatherReq, DEFAULT_COUNTRY_API_BASE,
};
pub use user::{user_get_by_open_id, user_upsert, UserDto, UserUpsertReq};
