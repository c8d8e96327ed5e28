//! Compiled-in reference catalogs.
//!
//! The collection forms draw their choices from fixed catalogs: the
//! risk-factor list shown in every survey, the marker palette keyed by
//! factor position, and the provincial catalog (each province with its
//! cantons) backing the location selectors.

/// Risk-factor catalog offered by the survey forms.
pub const RISK_FACTORS: &[&str] = &[
    "Calles sin iluminación adecuada por la noche.",
    "Calles con poca visibilidad por vegetación, muros o abandono.",
    "Zonas con lotes baldíos o propiedades abandonadas.",
    "Presencia de personas desconocidas merodeando sin razón aparente.",
    "Personas consumiendo drogas o alcohol en la vía pública.",
    "Posible venta de drogas en sitios privados (alerta comunitaria).",
    "Motocicletas sin placas o con conducta sospechosa.",
    "Ausencia de presencia policial visible o patrullajes limitados.",
    "Accesos rápidos de escape (callejones, ríos, rutas alternas).",
    "Espacios públicos deteriorados (parques, canchas, paradas).",
    "Falta de cámaras o videovigilancia comunitaria.",
    "Reportes de robos, tacha de vehículos o riñas.",
    "Percepción de inseguridad y acoso callejero.",
    "Otro: especificar.",
];

/// Marker palette; factors take colors by catalog position, wrapping.
pub const FACTOR_PALETTE: &[&str] = &[
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33",
    "#a65628", "#f781bf", "#999999", "#1b9e77", "#d95f02", "#7570b3",
    "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#1f78b4", "#b2df8a",
    "#fb9a99", "#cab2d6", "#fdbf6f", "#b15928",
];

/// Fallback marker color for values outside the catalog.
pub const UNKNOWN_FACTOR_COLOR: &str = "#555555";

/// The marker color assigned to a factor, or the fallback for strays.
pub fn factor_color(factor: &str) -> &'static str {
    RISK_FACTORS
        .iter()
        .position(|f| *f == factor)
        .map(|i| FACTOR_PALETTE[i % FACTOR_PALETTE.len()])
        .unwrap_or(UNKNOWN_FACTOR_COLOR)
}

/// Whether a factor string comes from the catalog.
pub fn is_known_factor(factor: &str) -> bool {
    RISK_FACTORS.contains(&factor)
}

/// Provincial catalog: each province of Costa Rica with its cantons.
pub const PROVINCES: &[(&str, &[&str])] = &[
    (
        "San José",
        &[
            "San José", "Escazú", "Desamparados", "Puriscal", "Tarrazú",
            "Aserrí", "Mora", "Goicoechea", "Santa Ana", "Alajuelita",
            "Vázquez de Coronado", "Acosta", "Tibás", "Moravia",
            "Montes de Oca", "Turrubares", "Dota", "Curridabat",
            "Pérez Zeledón", "León Cortés Castro",
        ],
    ),
    (
        "Alajuela",
        &[
            "Alajuela", "San Ramón", "Grecia", "San Mateo", "Atenas",
            "Naranjo", "Palmares", "Poás", "Orotina", "San Carlos",
            "Zarcero", "Sarchí", "Upala", "Los Chiles", "Guatuso",
            "Río Cuarto",
        ],
    ),
    (
        "Cartago",
        &[
            "Cartago", "Paraíso", "La Unión", "Jiménez", "Turrialba",
            "Alvarado", "Oreamuno", "El Guarco",
        ],
    ),
    (
        "Heredia",
        &[
            "Heredia", "Barva", "Santo Domingo", "Santa Bárbara",
            "San Rafael", "San Isidro", "Belén", "Flores", "San Pablo",
            "Sarapiquí",
        ],
    ),
    (
        "Guanacaste",
        &[
            "Liberia", "Nicoya", "Santa Cruz", "Bagaces", "Carrillo",
            "Cañas", "Abangares", "Tilarán", "Nandayure", "La Cruz",
            "Hojancha",
        ],
    ),
    (
        "Puntarenas",
        &[
            "Puntarenas", "Esparza", "Buenos Aires", "Montes de Oro",
            "Osa", "Quepos", "Golfito", "Coto Brus", "Parrita",
            "Corredores", "Garabito", "Monteverde", "Puerto Jiménez",
        ],
    ),
    (
        "Limón",
        &["Limón", "Pococí", "Siquirres", "Talamanca", "Matina", "Guácimo"],
    ),
];

/// Province names, in catalog order.
pub fn province_names() -> impl Iterator<Item = &'static str> {
    PROVINCES.iter().map(|(name, _)| *name)
}

/// The cantons of a province, or `None` for an unknown province.
pub fn cantons_of(province: &str) -> Option<&'static [&'static str]> {
    PROVINCES
        .iter()
        .find(|(name, _)| *name == province)
        .map(|(_, cantons)| *cantons)
}

/// Whether `canton` belongs to `province` per the catalog.
pub fn is_canton_of(province: &str, canton: &str) -> bool {
    cantons_of(province).is_some_and(|cantons| cantons.contains(&canton))
}
