//! City CRUD integration tests

use app_lib::app::{
    city_create, city_delete, city_get, city_list, city_list_by_country, city_update,
    country_create, CityCreateReq, CityUpdateReq, CountryCreateReq,
};
use app_lib::infra::db::init_test_db;
use app_lib::infra::{Availability, DbPool};
use std::collections::HashSet;

// ──────────────────────── Helper ────────────────────────

fn make_country(pool: &DbPool, name: &str) -> i64 {
    country_create(
        pool,
        CountryCreateReq {
            name: name.to_string(),
            continent: "América do Sul".to_string(),
            population: 1_000_000,
            language: "Português".to_string(),
            flag: None,
            currency: None,
            capital: None,
        },
    )
    .unwrap()
}

fn make_city(name: &str, country_id: i64) -> CityCreateReq {
    CityCreateReq {
        name: name.to_string(),
        population: 12_000_000,
        country_id,
        latitude: Some("-23.5505".to_string()),
        longitude: Some("-46.6333".to_string()),
    }
}

// ══════════════════════════════════════════════════════════
//  city_create
// ══════════════════════════════════════════════════════════

#[test]
fn create_city_round_trips_all_fields() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let id = city_create(&pool, make_city("São Paulo", br)).unwrap();

    let city = city_get(&pool, id).unwrap().ready().flatten().unwrap();
    assert_eq!(city.id, id);
    assert_eq!(city.name, "São Paulo");
    assert_eq!(city.population, 12_000_000);
    assert_eq!(city.country_id, br);
    assert_eq!(city.latitude.as_deref(), Some("-23.5505"));
    assert_eq!(city.longitude.as_deref(), Some("-46.6333"));
}

#[test]
fn create_city_without_coordinates() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let id = city_create(
        &pool,
        CityCreateReq {
            latitude: None,
            longitude: None,
            ..make_city("Recife", br)
        },
    )
    .unwrap();
    let city = city_get(&pool, id).unwrap().ready().flatten().unwrap();
    assert_eq!(city.latitude, None);
    assert_eq!(city.longitude, None);
}

#[test]
fn create_city_empty_name_fails() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let err = city_create(&pool, make_city(" ", br));
    assert_eq!(err.unwrap_err().code(), "VALIDATION_ERROR");
}

#[test]
fn create_city_negative_population_fails() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let err = city_create(
        &pool,
        CityCreateReq {
            population: -10,
            ..make_city("Natal", br)
        },
    );
    assert_eq!(err.unwrap_err().code(), "VALIDATION_ERROR");
}

#[test]
fn create_city_unknown_country_is_storage_error() {
    let pool = init_test_db();
    let err = city_create(&pool, make_city("Atlântida", 999)).unwrap_err();
    assert_eq!(err.code(), "DB_ERROR");
    assert!(err.to_string().contains("FOREIGN KEY"));
    assert!(city_list(&pool).unwrap().unwrap_or_default().is_empty());
}

// ══════════════════════════════════════════════════════════
//  city_list / city_list_by_country / city_get
// ══════════════════════════════════════════════════════════

#[test]
fn list_cities_returns_all() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let ar = make_country(&pool, "Argentina");
    city_create(&pool, make_city("Salvador", br)).unwrap();
    city_create(&pool, make_city("Córdoba", ar)).unwrap();
    assert_eq!(city_list(&pool).unwrap().unwrap_or_default().len(), 2);
}

#[test]
fn list_by_country_returns_exact_set() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let ar = make_country(&pool, "Argentina");
    let mut expected = HashSet::new();
    for name in ["São Paulo", "Rio de Janeiro", "Belo Horizonte"] {
        expected.insert(city_create(&pool, make_city(name, br)).unwrap());
    }
    city_create(&pool, make_city("Buenos Aires", ar)).unwrap();
    city_create(&pool, make_city("Rosario", ar)).unwrap();

    let cities = city_list_by_country(&pool, br).unwrap().ready().unwrap();
    let ids: Vec<i64> = cities.iter().map(|c| c.id).collect();
    let unique: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "no duplicates");
    assert_eq!(unique, expected);
    assert!(cities.iter().all(|c| c.country_id == br));
}

#[test]
fn list_by_country_unknown_or_empty_is_empty() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    assert_eq!(
        city_list_by_country(&pool, br).unwrap(),
        Availability::Ready(vec![])
    );
    assert_eq!(
        city_list_by_country(&pool, 777).unwrap(),
        Availability::Ready(vec![])
    );
}

#[test]
fn get_city_missing_id_is_absent() {
    let pool = init_test_db();
    assert_eq!(city_get(&pool, 1).unwrap(), Availability::Ready(None));
}

// ══════════════════════════════════════════════════════════
//  city_update
// ══════════════════════════════════════════════════════════

#[test]
fn update_city_partial_fields_keep_others() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let id = city_create(&pool, make_city("São Paulo", br)).unwrap();

    let updated = city_update(
        &pool,
        CityUpdateReq {
            id,
            population: Some(12_300_000),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(updated.population, 12_300_000);
    assert_eq!(updated.name, "São Paulo");
    assert_eq!(updated.country_id, br);
    assert_eq!(updated.latitude.as_deref(), Some("-23.5505"));
    assert_eq!(updated.longitude.as_deref(), Some("-46.6333"));
}

#[test]
fn update_city_moves_to_another_country() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let ar = make_country(&pool, "Argentina");
    let id = city_create(&pool, make_city("Posadas", br)).unwrap();

    let moved = city_update(
        &pool,
        CityUpdateReq {
            id,
            country_id: Some(ar),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(moved.country_id, ar);
    assert!(city_list_by_country(&pool, br).unwrap().unwrap_or_default().is_empty());
    assert_eq!(
        city_list_by_country(&pool, ar).unwrap().unwrap_or_default().len(),
        1
    );
}

#[test]
fn update_city_to_unknown_country_fails() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let id = city_create(&pool, make_city("Belém", br)).unwrap();
    let err = city_update(
        &pool,
        CityUpdateReq {
            id,
            country_id: Some(404),
            ..Default::default()
        },
    );
    assert_eq!(err.unwrap_err().code(), "DB_ERROR");
    let city = city_get(&pool, id).unwrap().ready().flatten().unwrap();
    assert_eq!(city.country_id, br);
}

#[test]
fn update_city_not_found_is_absent() {
    let pool = init_test_db();
    let res = city_update(
        &pool,
        CityUpdateReq {
            id: 31,
            name: Some("Nowhere".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(res.is_none());
}

#[test]
fn update_city_empty_name_fails() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let id = city_create(&pool, make_city("Fortaleza", br)).unwrap();
    let err = city_update(
        &pool,
        CityUpdateReq {
            id,
            name: Some(String::new()),
            ..Default::default()
        },
    );
    assert_eq!(err.unwrap_err().code(), "VALIDATION_ERROR");
}

// ══════════════════════════════════════════════════════════
//  city_delete
// ══════════════════════════════════════════════════════════

#[test]
fn delete_city_is_unconditional() {
    let pool = init_test_db();
    let br = make_country(&pool, "Brasil");
    let id = city_create(&pool, make_city("Campinas", br)).unwrap();
    city_delete(&pool, id).unwrap();
    assert_eq!(city_get(&pool, id).unwrap(), Availability::Ready(None));
    // deleting again still acknowledges
    city_delete(&pool, id).unwrap();
}
