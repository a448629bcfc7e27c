//! Symbolic names for memory addresses, status registers, entities and
//! destinations.
//!
//! Decoding helpers are total (unknown ids render as `unknown_<id>`);
//! encoding helpers are partial and return `None` for names nobody defined.

use crate::opcode::Granularity;

/// Savemap operand 0 corresponds to this absolute address.
pub const SAVEMAP_BASE: u32 = 0xBA4;

/// Named savemap locations, by absolute address.
pub static SAVEMAP: &[(u32, &str, Granularity)] = &[
    (0xBA4, "game_progress", Granularity::Word),
    (0xBF9, "chocobo_rating_1", Granularity::Byte),
    (0xBFA, "chocobo_rating_2", Granularity::Byte),
    (0xBFB, "chocobo_rating_3", Granularity::Byte),
    (0xBFC, "chocobo_rating_4", Granularity::Byte),
    (0xC1F, "weapons_killed", Granularity::Byte),
    (0xC21, "own_chocobo_stable", Granularity::Byte),
    (0xC22, "chocobos_on_map", Granularity::Byte),
    (0xC23, "vehicle_display", Granularity::Byte),
    (0xD73, "yuffie_flags", Granularity::Byte),
    (0xEF4, "submarine_color_flags", Granularity::Byte),
    (0xF2A, "submarine_flags", Granularity::Byte),
];

/// Special registers, by register id.
pub static SPECIAL: &[(u16, &str, Granularity)] = &[
    (0, "entity_mesh_x_coord", Granularity::Byte),
    (1, "entity_mesh_y_coord", Granularity::Byte),
    (2, "entity_coord_in_mesh_x", Granularity::Word),
    (3, "entity_coord_in_mesh_y", Granularity::Word),
    (4, "entity_direction", Granularity::Byte),
    (6, "last_field_id", Granularity::Byte),
    (7, "map_options", Granularity::Byte),
    (8, "player_entity_model_id", Granularity::Byte),
    (9, "current_entity_model_id", Granularity::Byte),
    (10, "check_if_riding_chocobo", Granularity::Byte),
    (11, "battle_result", Granularity::Bit),
    (12, "prompt_window_result", Granularity::Byte),
    (13, "current_triangle_script_id", Granularity::Byte),
    (14, "party_leader_model_id", Granularity::Byte),
    (16, "random_8bit_number", Granularity::Byte),
];

/// Model ids accepted wherever a script names an entity.
pub static ENTITIES: &[(u16, &str)] = &[
    (0, "cloud"),
    (1, "tifa"),
    (2, "cid"),
    (3, "highwind"),
    (4, "wild_chocobo"),
    (5, "tiny_bronco"),
    (6, "buggy"),
    (7, "junon_cannon"),
    (8, "cargo_ship"),
    (9, "highwind_propellers"),
    (10, "diamond_weapon"),
    (11, "ultima_weapon"),
    (12, "fort_condor"),
    (13, "submarine"),
    (14, "gold_saucer"),
    (15, "rocket_town_rocket"),
    (16, "rocket_town"),
    (17, "sunken_gelnika"),
    (18, "underwater_reactor"),
    (19, "chocobo"),
    (20, "midgar_cannon"),
    (24, "north_crater_barrier"),
    (25, "ancient_forest"),
    (26, "key_of_the_ancients"),
    (28, "red_submarine"),
    (29, "ruby_weapon"),
    (30, "emerald_weapon"),
    (65535, "system"),
];

/// Field scene destinations for `System.enter_field`. Indexed by id.
pub static FIELDS: [&str; 65] = [
    "other_worldmap",
    "midgar_sector_5_gate",
    "kalm",
    "chocobo_farm",
    "mythril_mines_from_swamp",
    "mythril_mines_from_condor",
    "fort_condor",
    "junon",
    "temple_of_the_ancients",
    "old_mans_house",
    "weapon_seller",
    "mideel",
    "quadra_magic_cave",
    "costa_del_sol",
    "mt_corel",
    "north_corel",
    "corel_desert",
    "gongaga",
    "cosmo_canyon",
    "nibelheim_south",
    "rocket_town_south",
    "lucrecias_cave",
    "hp_mp_cave",
    "plains_outside_wutai",
    "mime_cave",
    "bone_village",
    "corral_valley_cave",
    "icicle_village_south",
    "chocobo_sage_house",
    "knights_of_the_round_cave",
    "underwater_reactor",
    "sunken_gelnika",
    "impaled_zolom",
    "yuffie_encounter",
    "plains_outside_wutai_2",
    "plains_outside_wutai_3",
    "cargo_ship",
    "costa_del_sol_harbor",
    "costa_del_sol_harbor_2",
    "junon_dock",
    "unused_40",
    "unused_41",
    "unused_42",
    "nibelheim_north",
    "mt_nibel_from_rocket_town",
    "unused_45",
    "mt_nibel_from_nibelheim",
    "icicle_village_north",
    "great_glacier",
    "unused_49",
    "highwind_bridge_3",
    "highwind_bridge_4",
    "highwind_bridge_5",
    "diamond_weapon_encounter",
    "unused_54",
    "ancient_forest",
    "submarine_bridge_3",
    "corral_valley",
    "forgotten_capital",
    "highwind_deck",
    "gaeas_cliff_base",
    "great_glacier_2",
    "great_glacier_3",
    "great_glacier_4",
    "great_glacier_5",
];

/// Special registers whose values are entity ids.
pub static ENTITY_REGISTERS: &[&str] = &[
    "player_entity_model_id",
    "current_entity_model_id",
    "party_leader_model_id",
];

/// Well-known system script slots.
pub static SYSTEM_SCRIPTS: &[(u16, &str)] = &[
    (0, "init"),
    (2, "update"),
    (6, "highwind_menu"),
    (7, "zolom_touched"),
    (9, "crater_landing"),
];

/// Well-known model script slots.
pub static MODEL_SCRIPTS: &[(u16, &str)] = &[
    (0, "init"),
    (1, "unload"),
    (2, "update"),
    (3, "touch"),
    (4, "interact"),
    (5, "disembark"),
];

const UNKNOWN_PREFIX: &str = "unknown_";

/// Named savemap location at an absolute address, if its width matches.
pub fn savemap_name(address: u32, granularity: Granularity) -> Option<&'static str> {
    SAVEMAP
        .iter()
        .find(|&&(a, _, g)| a == address && g == granularity)
        .map(|&(_, name, _)| name)
}

/// Absolute address and width of a named savemap location.
pub fn savemap_address(name: &str) -> Option<(u32, Granularity)> {
    SAVEMAP
        .iter()
        .find(|&&(_, n, _)| n == name)
        .map(|&(a, _, g)| (a, g))
}

pub fn special_register(id: u16) -> Option<(&'static str, Granularity)> {
    SPECIAL
        .iter()
        .find(|&&(i, _, _)| i == id)
        .map(|&(_, name, g)| (name, g))
}

/// Register id and width for a Special name. The `unknown_XX` placeholder
/// (hex id) resolves to a byte register.
pub fn special_id(name: &str) -> Option<(u16, Granularity)> {
    if let Some(&(id, _, g)) = SPECIAL.iter().find(|&&(_, n, _)| n == name) {
        return Some((id, g));
    }
    let hex = name.strip_prefix(UNKNOWN_PREFIX)?;
    let id = u16::from_str_radix(hex, 16).ok()?;
    special_register(id).is_none().then_some((id, Granularity::Byte))
}

/// Placeholder for a byte register with no name.
pub fn special_placeholder(id: u16) -> String {
    format!("{UNKNOWN_PREFIX}{id:02x}")
}

pub fn entity_name(id: u16) -> String {
    defined_entity(id)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{UNKNOWN_PREFIX}{id}"))
}

pub fn defined_entity(id: u16) -> Option<&'static str> {
    ENTITIES.iter().find(|&&(i, _)| i == id).map(|&(_, n)| n)
}

/// Entity id for a name; `unknown_<decimal>` maps back to its id.
pub fn entity_id(name: &str) -> Option<u16> {
    if let Some(&(id, _)) = ENTITIES.iter().find(|&&(_, n)| n == name) {
        return Some(id);
    }
    let id = placeholder_id(name)?;
    defined_entity(id).is_none().then_some(id)
}

pub fn field_name(id: u16) -> String {
    defined_field(id)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{UNKNOWN_PREFIX}{id}"))
}

pub fn defined_field(id: u16) -> Option<&'static str> {
    FIELDS.get(id as usize).copied()
}

/// Field id for a name; `unknown_<decimal>` maps back to its id.
pub fn field_id(name: &str) -> Option<u16> {
    if let Some(id) = FIELDS.iter().position(|&n| n == name) {
        return Some(id as u16);
    }
    let id = placeholder_id(name)?;
    defined_field(id).is_none().then_some(id)
}

/// Whether literals compared against `Special.<register>` are entity ids.
pub fn is_entity_register(register: &str) -> bool {
    ENTITY_REGISTERS.contains(&register)
}

/// Which table of script slot names applies to a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptKind {
    System,
    Model,
}

/// Display name for a script slot, e.g. `system_2_update` or `model_5`.
pub fn script_name(kind: ScriptKind, id: u16) -> String {
    let (prefix, table) = match kind {
        ScriptKind::System => ("system", SYSTEM_SCRIPTS),
        ScriptKind::Model => ("model", MODEL_SCRIPTS),
    };
    match table.iter().find(|&&(i, _)| i == id) {
        Some((_, name)) => format!("{prefix}_{id}_{name}"),
        None => format!("{prefix}_{id}"),
    }
}

fn placeholder_id(name: &str) -> Option<u16> {
    let digits = name.strip_prefix(UNKNOWN_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
