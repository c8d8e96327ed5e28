//! The fixed descriptor catalog.
//!
//! Frequency tables are keyed by descriptor labels drawn from this
//! catalog. Each descriptor belongs to one of three categories used in
//! the report's breakdown section. Labels outside the catalog are
//! accepted and classified as "Otros factores".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Report category of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A criminal offence.
    #[serde(rename = "Delito")]
    Delito,
    /// A social-risk condition.
    #[serde(rename = "Riesgo social")]
    RiesgoSocial,
    /// Environmental and other contributing factors.
    #[serde(rename = "Otros factores")]
    OtrosFactores,
}

impl Category {
    /// Every category, in report order.
    pub const ALL: [Category; 3] = [
        Category::Delito,
        Category::RiesgoSocial,
        Category::OtrosFactores,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Delito => f.write_str("Delito"),
            Category::RiesgoSocial => f.write_str("Riesgo social"),
            Category::OtrosFactores => f.write_str("Otros factores"),
        }
    }
}

/// The catalog: every known descriptor with its category.
pub const DESCRIPTORS: &[(&str, Category)] = &[
    // --- Delitos ---
    ("Homicidio", Category::Delito),
    ("Femicidio", Category::Delito),
    ("Tentativa de homicidio", Category::Delito),
    ("Sicariato", Category::Delito),
    ("Balaceras", Category::Delito),
    ("Disparos en vía pública", Category::Delito),
    ("Portación ilegal de arma de fuego", Category::Delito),
    ("Portación de arma blanca", Category::Delito),
    ("Asalto a persona con arma de fuego", Category::Delito),
    ("Asalto a persona con arma blanca", Category::Delito),
    ("Asalto a transporte público", Category::Delito),
    ("Asalto a comercio", Category::Delito),
    ("Robo a vivienda", Category::Delito),
    ("Robo a comercio", Category::Delito),
    ("Robo a edificación", Category::Delito),
    ("Robo de vehículo", Category::Delito),
    ("Robo de motocicleta", Category::Delito),
    ("Tacha de vehículo", Category::Delito),
    ("Robo de bicicleta", Category::Delito),
    ("Robo de ganado", Category::Delito),
    ("Robo de cable y materiales", Category::Delito),
    ("Hurto menor", Category::Delito),
    ("Carterismo", Category::Delito),
    ("Receptación de bienes robados", Category::Delito),
    ("Venta de drogas en vía pública", Category::Delito),
    ("Venta de drogas en sitio privado", Category::Delito),
    ("Búnker de venta de drogas", Category::Delito),
    ("Tráfico de drogas", Category::Delito),
    ("Narcomenudeo", Category::Delito),
    ("Cultivo ilegal", Category::Delito),
    ("Extorsión", Category::Delito),
    ("Préstamos gota a gota", Category::Delito),
    ("Estafa", Category::Delito),
    ("Estafa electrónica", Category::Delito),
    ("Contrabando", Category::Delito),
    ("Daños a la propiedad", Category::Delito),
    ("Vandalismo", Category::Delito),
    ("Incendio provocado", Category::Delito),
    ("Agresión física", Category::Delito),
    ("Riñas", Category::Delito),
    ("Lesiones", Category::Delito),
    ("Amenazas", Category::Delito),
    ("Violencia doméstica", Category::Delito),
    ("Incumplimiento de medidas de protección", Category::Delito),
    ("Abuso sexual", Category::Delito),
    ("Violación", Category::Delito),
    ("Acoso sexual callejero", Category::Delito),
    ("Explotación sexual comercial", Category::Delito),
    ("Trata de personas", Category::Delito),
    ("Tráfico ilícito de migrantes", Category::Delito),
    ("Secuestro", Category::Delito),
    ("Privación de libertad", Category::Delito),
    ("Reclutamiento de menores por estructuras", Category::Delito),
    ("Ajuste de cuentas", Category::Delito),
    ("Enfrentamientos entre estructuras", Category::Delito),
    ("Homicidio por encargo", Category::Delito),
    ("Legitimación de capitales", Category::Delito),
    ("Corrupción de funcionarios", Category::Delito),
    ("Caza ilegal", Category::Delito),
    ("Pesca ilegal", Category::Delito),
    ("Tala ilegal", Category::Delito),
    ("Maltrato animal", Category::Delito),
    ("Conducción temeraria", Category::Delito),
    ("Piques clandestinos", Category::Delito),
    ("Venta ilegal de licor", Category::Delito),
    ("Ventas informales ilegales", Category::Delito),
    ("Usurpación de terrenos", Category::Delito),
    ("Abigeato", Category::Delito),
    ("Robo en centros educativos", Category::Delito),
    ("Robo en templos religiosos", Category::Delito),
    // --- Riesgo social ---
    ("Consumo de drogas en vía pública", Category::RiesgoSocial),
    ("Consumo de alcohol en vía pública", Category::RiesgoSocial),
    ("Consumo problemático en menores", Category::RiesgoSocial),
    ("Deserción escolar", Category::RiesgoSocial),
    ("Ausentismo escolar", Category::RiesgoSocial),
    ("Bullying escolar", Category::RiesgoSocial),
    ("Violencia en centros educativos", Category::RiesgoSocial),
    ("Embarazo adolescente", Category::RiesgoSocial),
    ("Trabajo infantil", Category::RiesgoSocial),
    ("Menores en calle en horario nocturno", Category::RiesgoSocial),
    ("Menores sin supervisión", Category::RiesgoSocial),
    ("Desempleo", Category::RiesgoSocial),
    ("Empleo informal predominante", Category::RiesgoSocial),
    ("Falta de oportunidades laborales para jóvenes", Category::RiesgoSocial),
    ("Pobreza extrema", Category::RiesgoSocial),
    ("Hacinamiento habitacional", Category::RiesgoSocial),
    ("Asentamientos informales", Category::RiesgoSocial),
    ("Personas en situación de calle", Category::RiesgoSocial),
    ("Personas con adicciones sin atención", Category::RiesgoSocial),
    ("Enfermedad mental sin atención", Category::RiesgoSocial),
    ("Violencia intrafamiliar", Category::RiesgoSocial),
    ("Negligencia en el cuido de menores", Category::RiesgoSocial),
    ("Negligencia en el cuido de adultos mayores", Category::RiesgoSocial),
    ("Abandono de adultos mayores", Category::RiesgoSocial),
    ("Pandillas juveniles", Category::RiesgoSocial),
    ("Presencia de estructuras criminales", Category::RiesgoSocial),
    ("Identificación de jóvenes con estructuras", Category::RiesgoSocial),
    ("Xenofobia y conflictos entre comunidades", Category::RiesgoSocial),
    ("Discriminación a poblaciones vulnerables", Category::RiesgoSocial),
    ("Migración irregular sin arraigo", Category::RiesgoSocial),
    ("Prostitución en vía pública", Category::RiesgoSocial),
    ("Ludopatía", Category::RiesgoSocial),
    ("Baja escolaridad de jefaturas de hogar", Category::RiesgoSocial),
    ("Hogares monoparentales sin redes de apoyo", Category::RiesgoSocial),
    ("Desintegración familiar", Category::RiesgoSocial),
    ("Falta de espacios de recreación juvenil", Category::RiesgoSocial),
    ("Ocio sin alternativas en jóvenes", Category::RiesgoSocial),
    ("Percepción de inseguridad", Category::RiesgoSocial),
    ("Desconfianza en la policía", Category::RiesgoSocial),
    ("Temor a denunciar", Category::RiesgoSocial),
    ("Normalización de la violencia", Category::RiesgoSocial),
    ("Conflictos vecinales recurrentes", Category::RiesgoSocial),
    ("Ruido y desorden en la madrugada", Category::RiesgoSocial),
    ("Fiestas clandestinas", Category::RiesgoSocial),
    ("Venta de alcohol a menores", Category::RiesgoSocial),
    ("Acceso de menores a armas", Category::RiesgoSocial),
    ("Deudas con prestamistas informales", Category::RiesgoSocial),
    ("Inseguridad alimentaria", Category::RiesgoSocial),
    ("Falta de redes comunitarias", Category::RiesgoSocial),
    ("Baja participación comunitaria", Category::RiesgoSocial),
    ("Ausencia de comités de seguridad", Category::RiesgoSocial),
    ("Líderes comunales amenazados", Category::RiesgoSocial),
    ("Desplazamiento por violencia", Category::RiesgoSocial),
    ("Viviendas usadas para actividades ilícitas", Category::RiesgoSocial),
    ("Alquileres informales sin control", Category::RiesgoSocial),
    ("Cuarterías en condición precaria", Category::RiesgoSocial),
    ("Transporte informal (piratas)", Category::RiesgoSocial),
    ("Menores dedicados a ventas ambulantes", Category::RiesgoSocial),
    ("Explotación laboral", Category::RiesgoSocial),
    ("Analfabetismo digital", Category::RiesgoSocial),
    // --- Otros factores ---
    ("Calles sin iluminación", Category::OtrosFactores),
    ("Luminarias dañadas sin reposición", Category::OtrosFactores),
    ("Poca visibilidad por vegetación", Category::OtrosFactores),
    ("Lotes baldíos enmontados", Category::OtrosFactores),
    ("Propiedades abandonadas", Category::OtrosFactores),
    ("Edificaciones en ruina", Category::OtrosFactores),
    ("Parques deteriorados", Category::OtrosFactores),
    ("Canchas deportivas abandonadas", Category::OtrosFactores),
    ("Paradas de bus inseguras", Category::OtrosFactores),
    ("Puentes peatonales deteriorados", Category::OtrosFactores),
    ("Alamedas sin mantenimiento", Category::OtrosFactores),
    ("Aceras intransitables", Category::OtrosFactores),
    ("Calles en mal estado", Category::OtrosFactores),
    ("Ausencia de demarcación vial", Category::OtrosFactores),
    ("Falta de cámaras de videovigilancia", Category::OtrosFactores),
    ("Cámaras existentes fuera de servicio", Category::OtrosFactores),
    ("Ausencia de patrullaje policial", Category::OtrosFactores),
    ("Delegación policial distante", Category::OtrosFactores),
    ("Tiempos de respuesta policial largos", Category::OtrosFactores),
    ("Accesos de escape rápidos (callejones)", Category::OtrosFactores),
    ("Ríos y cauces usados como rutas de escape", Category::OtrosFactores),
    ("Rutas alternas sin control", Category::OtrosFactores),
    ("Pasos a pie no vigilados entre barrios", Category::OtrosFactores),
    ("Botaderos clandestinos", Category::OtrosFactores),
    ("Acumulación de basura", Category::OtrosFactores),
    ("Aguas estancadas", Category::OtrosFactores),
    ("Contaminación sónica", Category::OtrosFactores),
    ("Grafitis de estructuras criminales", Category::OtrosFactores),
    ("Venta ambulante desordenada", Category::OtrosFactores),
    ("Bares y cantinas sin control de horario", Category::OtrosFactores),
    ("Locales nocturnos conflictivos", Category::OtrosFactores),
    ("Hospedajes sin registro", Category::OtrosFactores),
    ("Zonas francas de estacionamiento informal", Category::OtrosFactores),
    ("Motocicletas sin placas circulando", Category::OtrosFactores),
    ("Vehículos abandonados en vía pública", Category::OtrosFactores),
    ("Terminales de transporte desordenadas", Category::OtrosFactores),
    ("Mercados con control insuficiente", Category::OtrosFactores),
    ("Zonas comerciales sin cortinas de seguridad", Category::OtrosFactores),
    ("Cajeros automáticos en puntos ciegos", Category::OtrosFactores),
    ("Ausencia de señalización de emergencias", Category::OtrosFactores),
];

/// Category of a label, defaulting strays to "Otros factores".
pub fn category_of(label: &str) -> Category {
    DESCRIPTORS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, category)| *category)
        .unwrap_or(Category::OtrosFactores)
}

/// Whether the label comes from the catalog.
pub fn is_cataloged(label: &str) -> bool {
    DESCRIPTORS.iter().any(|(name, _)| *name == label)
}
