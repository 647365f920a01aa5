//! Industry and location catalogs, the cascading search form, and shareable
//! deep links (`?country=..&city=..`).

use url::Url;

use crate::model::SearchFilters;

/// Category selected when nothing else is requested.
pub const DEFAULT_CATEGORY: &str = "Salud";

/// Country selected when nothing else is requested.
pub const DEFAULT_COUNTRY: &str = "Colombia";

/// City selected when nothing else is requested.
pub const DEFAULT_CITY: &str = "Bogotá";

/// Industry category -> sub-industries, in display order.
pub const INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "Salud",
        &[
            "Médicos Generales",
            "Odontólogos",
            "Psicólogos",
            "Esteticistas",
            "Clínicas",
            "Optómetras",
            "Fisioterapeutas",
            "Quiroprácticos",
            "Dermatólogos",
            "Pediatras",
            "Nutricionistas",
        ],
    ),
    (
        "Belleza y Bienestar",
        &[
            "Salones de Belleza",
            "Spas",
            "Barberías",
            "Centros de Uñas",
            "Centros de Bronceo",
            "Maquilladores",
            "Depilación Láser",
        ],
    ),
    (
        "Hostelería y Turismo",
        &[
            "Restaurantes",
            "Hoteles",
            "Cafeterías",
            "Bares",
            "Gastrobares",
            "Agencias de Viajes",
            "Hostales",
            "Glampings",
        ],
    ),
    (
        "Comercio Minorista",
        &[
            "Droguerías / Farmacias",
            "Ópticas",
            "Tiendas de Ropa",
            "Floristerías",
            "Ferreterías",
            "Tiendas de Mascotas",
            "Jugueterías",
            "Joyerías",
        ],
    ),
    (
        "Servicios Profesionales",
        &[
            "Abogados",
            "Contadores",
            "Inmobiliarias",
            "Seguros",
            "Arquitectos",
            "Consultores de Marketing",
            "Notarías",
        ],
    ),
    (
        "Automotriz",
        &[
            "Talleres Mecánicos",
            "Concesionarios",
            "Lavaderos de Autos",
            "Venta de Repuestos",
            "Centros de Diagnóstico",
        ],
    ),
    (
        "Educación",
        &[
            "Colegios Privados",
            "Jardines Infantiles",
            "Academias de Idiomas",
            "Escuelas de Música",
            "Centros de Tutoría",
        ],
    ),
];

/// Country -> cities, in display order.
pub const LOCATIONS: &[(&str, &[&str])] = &[
    (
        "Colombia",
        &[
            "Bogotá",
            "Medellín",
            "Cali",
            "Barranquilla",
            "Cartagena",
            "Bucaramanga",
            "Pereira",
            "Manizales",
            "Santa Marta",
            "Cúcuta",
            "Villavicencio",
            "Ibagué",
        ],
    ),
    (
        "Estados Unidos",
        &[
            "Miami",
            "Orlando",
            "New York",
            "Los Angeles",
            "Houston",
            "Chicago",
            "Austin",
            "San Francisco",
        ],
    ),
    (
        "Emiratos Árabes Unidos",
        &["Dubái", "Abu Dabi", "Sharjah", "Ajman"],
    ),
    (
        "México",
        &[
            "Ciudad de México",
            "Monterrey",
            "Guadalajara",
            "Cancún",
            "Puebla",
            "Tijuana",
            "Mérida",
            "Querétaro",
        ],
    ),
    (
        "España",
        &[
            "Madrid",
            "Barcelona",
            "Valencia",
            "Sevilla",
            "Málaga",
            "Bilbao",
            "Zaragoza",
        ],
    ),
    (
        "Bolivia",
        &[
            "La Paz",
            "Santa Cruz de la Sierra",
            "Cochabamba",
            "Sucre",
            "Tarija",
        ],
    ),
    ("Perú", &["Lima", "Arequipa", "Trujillo", "Cusco", "Piura"]),
    (
        "Chile",
        &[
            "Santiago",
            "Valparaíso",
            "Concepción",
            "Viña del Mar",
            "Antofagasta",
        ],
    ),
    (
        "Argentina",
        &["Buenos Aires", "Córdoba", "Rosario", "Mendoza", "La Plata"],
    ),
    ("Ecuador", &["Quito", "Guayaquil", "Cuenca", "Manta"]),
    ("Panamá", &["Ciudad de Panamá", "Colón", "David"]),
];

/// Errors from catalog selection and deep links.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Category is not in [`INDUSTRIES`].
    #[error("unknown industry category: {0}")]
    UnknownCategory(String),

    /// Sub-industry does not belong to the selected category.
    #[error("\"{industry}\" is not part of category \"{category}\"")]
    UnknownIndustry {
        /// Selected category.
        category: String,
        /// Rejected sub-industry.
        industry: String,
    },

    /// Country is not in [`LOCATIONS`].
    #[error("unknown country: {0}")]
    UnknownCountry(String),

    /// City does not belong to the selected country.
    #[error("\"{city}\" is not a listed city of \"{country}\"")]
    UnknownCity {
        /// Selected country.
        country: String,
        /// Rejected city.
        city: String,
    },

    /// Custom location mode with nothing typed.
    #[error("custom location is empty")]
    EmptyLocation,

    /// Base URL for a deep link could not be parsed.
    #[error("invalid link base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Sub-industries of a category.
pub fn sub_industries(category: &str) -> Option<&'static [&'static str]> {
    INDUSTRIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, items)| *items)
}

/// Cities of a country.
pub fn cities(country: &str) -> Option<&'static [&'static str]> {
    LOCATIONS
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, items)| *items)
}

/// Category names in display order.
pub fn categories() -> impl Iterator<Item = &'static str> {
    INDUSTRIES.iter().map(|(name, _)| *name)
}

/// Country names in display order.
pub fn countries() -> impl Iterator<Item = &'static str> {
    LOCATIONS.iter().map(|(name, _)| *name)
}

fn first_of(items: Option<&'static [&'static str]>) -> String {
    items
        .and_then(|items| items.first())
        .map(|s| (*s).to_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Search form
// ---------------------------------------------------------------------------

/// Cascading industry / location selection.
///
/// Changing the category resets the sub-industry to the category's first
/// entry; changing the country resets the city to the country's first city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    category: String,
    sub_industry: String,
    country: String,
    city: String,
    custom_location: Option<String>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_owned(),
            sub_industry: first_of(sub_industries(DEFAULT_CATEGORY)),
            country: DEFAULT_COUNTRY.to_owned(),
            city: DEFAULT_CITY.to_owned(),
            custom_location: None,
        }
    }
}

impl SearchForm {
    /// Selected category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Selected sub-industry.
    pub fn sub_industry(&self) -> &str {
        &self.sub_industry
    }

    /// Selected country.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Selected city.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Free-form location, when custom mode is on.
    pub fn custom_location(&self) -> Option<&str> {
        self.custom_location.as_deref()
    }

    /// Select a category and reset the sub-industry to its first entry.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownCategory`]; the form is left unchanged.
    pub fn select_category(&mut self, category: &str) -> Result<(), CatalogError> {
        let items = sub_industries(category)
            .ok_or_else(|| CatalogError::UnknownCategory(category.to_owned()))?;
        self.category = category.to_owned();
        self.sub_industry = first_of(Some(items));
        Ok(())
    }

    /// Select a sub-industry of the current category.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownIndustry`] when it is not in the category.
    pub fn select_sub_industry(&mut self, industry: &str) -> Result<(), CatalogError> {
        let listed = sub_industries(&self.category).is_some_and(|items| items.contains(&industry));
        if !listed {
            return Err(CatalogError::UnknownIndustry {
                category: self.category.clone(),
                industry: industry.to_owned(),
            });
        }
        self.sub_industry = industry.to_owned();
        Ok(())
    }

    /// Select a country, leave custom mode, and reset the city to the
    /// country's first city.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownCountry`]; the form is left unchanged.
    pub fn select_country(&mut self, country: &str) -> Result<(), CatalogError> {
        let items =
            cities(country).ok_or_else(|| CatalogError::UnknownCountry(country.to_owned()))?;
        self.country = country.to_owned();
        self.city = first_of(Some(items));
        self.custom_location = None;
        Ok(())
    }

    /// Select a city of the current country.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownCity`] when it is not listed for the country.
    pub fn select_city(&mut self, city: &str) -> Result<(), CatalogError> {
        let listed = cities(&self.country).is_some_and(|items| items.contains(&city));
        if !listed {
            return Err(CatalogError::UnknownCity {
                country: self.country.clone(),
                city: city.to_owned(),
            });
        }
        self.city = city.to_owned();
        Ok(())
    }

    /// Switch to a free-form location.
    pub fn use_custom_location(&mut self, location: impl Into<String>) {
        self.custom_location = Some(location.into());
    }

    /// `"City, Country"`, or the custom location.
    pub fn location(&self) -> String {
        match &self.custom_location {
            Some(custom) => custom.trim().to_owned(),
            None => format!("{}, {}", self.city, self.country),
        }
    }

    /// Filters for a discovery search, with the default pain points.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyLocation`] in custom mode with a blank location.
    pub fn to_filters(&self) -> Result<SearchFilters, CatalogError> {
        let location = self.location();
        if location.is_empty() {
            return Err(CatalogError::EmptyLocation);
        }
        Ok(SearchFilters::new(self.sub_industry.clone(), location))
    }

    /// Form pre-populated from a deep link.
    ///
    /// A listed country with one of its cities is used as is; a listed
    /// country with an unlisted city falls back to the country's first
    /// city; an unlisted country keeps the defaults.
    pub fn from_deep_link(link: &DeepLink) -> Self {
        let mut form = Self::default();
        let country = link.country.as_deref().unwrap_or(DEFAULT_COUNTRY);
        if form.select_country(country).is_ok() {
            if let Some(city) = link.city.as_deref() {
                // Unlisted city keeps the first city chosen above.
                let _ = form.select_city(city);
            }
        }
        form
    }
}

// ---------------------------------------------------------------------------
// Deep links
// ---------------------------------------------------------------------------

/// Location parameters carried by a shareable link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    /// `country` parameter.
    pub country: Option<String>,
    /// `city` parameter.
    pub city: Option<String>,
}

impl DeepLink {
    /// Link for a form's current country and city.
    pub fn for_form(form: &SearchForm) -> Self {
        Self {
            country: Some(form.country.clone()),
            city: Some(form.city.clone()),
        }
    }

    /// Read `country` and `city` from a full URL or a bare query string
    /// (with or without the leading `?`). Blank values count as absent.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let query = match Url::parse(input) {
            Ok(url) => url.query().unwrap_or_default().to_owned(),
            Err(_) => input.trim_start_matches('?').to_owned(),
        };

        let mut link = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "country" => link.country = Some(value.to_owned()),
                "city" => link.city = Some(value.to_owned()),
                _ => {}
            }
        }
        link
    }

    /// Shareable URL: `base` with `country` and `city` query parameters.
    ///
    /// # Errors
    ///
    /// [`CatalogError::InvalidBaseUrl`] when `base` is not an absolute URL.
    pub fn to_url(&self, base: &str) -> Result<Url, CatalogError> {
        let mut url = Url::parse(base).map_err(|e| CatalogError::InvalidBaseUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            if let Some(country) = &self.country {
                pairs.append_pair("country", country);
            }
            if let Some(city) = &self.city {
                pairs.append_pair("city", city);
            }
        }
        Ok(url)
    }
}
