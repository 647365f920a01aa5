//! Catalog cascading selection and deep links.

use leadhunter::catalog::{
    cities, sub_industries, CatalogError, DeepLink, SearchForm, DEFAULT_CITY, DEFAULT_COUNTRY,
};
use leadhunter::model::default_pain_points;

#[test]
fn deep_link_pre_populates_country_and_city_exactly() {
    let link = DeepLink::parse(
        "https://leadhunter.app/?country=Emiratos%20%C3%81rabes%20Unidos&city=Dub%C3%A1i",
    );
    assert_eq!(link.country.as_deref(), Some("Emiratos Árabes Unidos"));
    assert_eq!(link.city.as_deref(), Some("Dubái"));

    let form = SearchForm::from_deep_link(&link);
    assert_eq!(form.country(), "Emiratos Árabes Unidos");
    assert_eq!(form.city(), "Dubái");
    assert_eq!(form.location(), "Dubái, Emiratos Árabes Unidos");
}

#[test]
fn known_country_with_unknown_city_uses_first_city() {
    let form = SearchForm::from_deep_link(&DeepLink::parse("country=México&city=Atlantis"));
    assert_eq!(form.country(), "México");
    assert_eq!(form.city(), "Ciudad de México");
}

#[test]
fn unknown_country_keeps_defaults() {
    let form = SearchForm::from_deep_link(&DeepLink::parse("?country=Narnia&city=Cair+Paravel"));
    assert_eq!(form.country(), DEFAULT_COUNTRY);
    assert_eq!(form.city(), DEFAULT_CITY);
}

#[test]
fn city_without_country_is_matched_against_default_country() {
    let form = SearchForm::from_deep_link(&DeepLink::parse("city=Medellín"));
    assert_eq!(form.location(), "Medellín, Colombia");
}

#[test]
fn to_url_round_trips_through_parse() {
    let mut form = SearchForm::default();
    form.select_country("España").expect("listed");
    form.select_city("Sevilla").expect("listed");

    let url = DeepLink::for_form(&form)
        .to_url("https://leadhunter.app/agents?ref=old")
        .expect("valid base");
    assert_eq!(url.path(), "/agents");
    assert!(!url.as_str().contains("ref=old"));

    let back = SearchForm::from_deep_link(&DeepLink::parse(url.as_str()));
    assert_eq!(back.location(), "Sevilla, España");
}

#[test]
fn to_url_rejects_relative_base() {
    let result = DeepLink::default().to_url("/relative");
    assert!(matches!(result, Err(CatalogError::InvalidBaseUrl(_))));
}

#[test]
fn selecting_category_resets_sub_industry() {
    let mut form = SearchForm::default();
    form.select_sub_industry("Odontólogos").expect("listed");
    form.select_category("Automotriz").expect("listed");
    assert_eq!(form.sub_industry(), "Talleres Mecánicos");

    let err = form.select_sub_industry("Odontólogos").expect_err("wrong category");
    assert!(matches!(err, CatalogError::UnknownIndustry { .. }));
    assert_eq!(form.sub_industry(), "Talleres Mecánicos");
}

#[test]
fn selecting_country_resets_city() {
    let mut form = SearchForm::default();
    form.select_city("Cali").expect("listed");
    form.select_country("Bolivia").expect("listed");
    assert_eq!(form.city(), "La Paz");
    assert!(form.select_city("Cali").is_err());
}

#[test]
fn custom_location_wins_until_a_country_is_picked() {
    let mut form = SearchForm::default();
    form.use_custom_location("  Doral, Florida ");
    assert_eq!(form.location(), "Doral, Florida");

    let filters = form.to_filters().expect("custom location is set");
    assert_eq!(filters.location, "Doral, Florida");
    assert_eq!(filters.industry, "Médicos Generales");
    assert_eq!(filters.pain_points, default_pain_points());

    form.select_country("Chile").expect("listed");
    assert_eq!(form.custom_location(), None);
    assert_eq!(form.location(), "Santiago, Chile");
}

#[test]
fn blank_custom_location_cannot_be_searched() {
    let mut form = SearchForm::default();
    form.use_custom_location("   ");
    assert_eq!(form.to_filters(), Err(CatalogError::EmptyLocation));
}

#[test]
fn catalog_sizes_match_the_form_data() {
    assert_eq!(sub_industries("Salud").map(<[_]>::len), Some(11));
    assert_eq!(cities("Panamá").map(<[_]>::len), Some(3));
    assert_eq!(leadhunter::catalog::categories().count(), 7);
    assert_eq!(leadhunter::catalog::countries().count(), 11);
}
