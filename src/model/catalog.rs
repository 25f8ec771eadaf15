//! Fixed catalogs offered by the inspection form.

/// Damage categories an inspector can toggle on a record.
pub const DAMAGE_CATALOG: &[&str] = &[
    "Cobertura",
    "Telhado",
    "Forro",
    "Paredes",
    "Estrutura",
    "Fundação",
    "Esquadrias",
    "Portas",
    "Janelas",
    "Piso",
    "Instalações Elétricas",
    "Instalações Hidráulicas",
    "Muro",
    "Calçada",
];

/// The typology value that switches the form to free-text input.
pub const TYPOLOGY_OTHER: &str = "Outro";

/// Building typologies.
pub const TYPOLOGY_CATALOG: &[&str] = &[
    "Residencial Alvenaria",
    "Residencial Madeira",
    "Residencial Mista",
    "Comercial",
    "Industrial",
    "Edificação Pública",
    "Rural",
    TYPOLOGY_OTHER,
];

/// Brazilian federative units accepted as an engineer's registration state.
pub const STATE_CODES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

pub fn is_catalog_damage(damage_type: &str) -> bool {
    DAMAGE_CATALOG.contains(&damage_type)
}
