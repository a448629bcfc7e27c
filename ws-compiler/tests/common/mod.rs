#![allow(dead_code)]

use ws_compiler::compile_to_listing;

pub const BRIDGE_OFFSET: u32 = 0x181E;

pub const BRIDGE_SCRIPT: &str = "\
if Entity.distance_to_entity(Entities.gold_saucer) <= 100 then
  Entity.stop()
end
if Savemap.game_progress < 1580 then
  if Entity.distance_to_point(14) <= 256 then
    System.call_function(20, Entities.highwind)
  end
  goto label_1856
end
if Savemap.game_progress == 1580 then
  if Entity.distance_to_point(14) <= 256 then
    System.enter_field(Fields.highwind_bridge_5, 0)
  end
end
::label_1856::
if Savemap.game_progress == 1596 then
  if Entity.distance_to_point(9) <= 256 then
    Savemap.game_progress = 1598
    System.enter_field(Fields.highwind_bridge_5, 0)
    Savemap[0xF29].bit[6] = 1
  end
end
return";

pub const BRIDGE_LISTING: &str = "\
RESET
PUSH_CONSTANT 0E
DIST_MODEL
PUSH_CONSTANT 64
LE
GOTO_IF_FALSE 1828
STOP
RESET
PUSH_SAVEMAP_WORD 00
PUSH_CONSTANT 062C
LT
GOTO_IF_FALSE 183F
RESET
PUSH_CONSTANT 0E
DIST_POINT
PUSH_CONSTANT 0100
LE
GOTO_IF_FALSE 183D
RESET
PUSH_CONSTANT 03
CALL_FN_20
GOTO 1856
RESET
PUSH_SAVEMAP_WORD 00
PUSH_CONSTANT 062C
EQ
GOTO_IF_FALSE 1856
RESET
PUSH_CONSTANT 0E
DIST_POINT
PUSH_CONSTANT 0100
LE
GOTO_IF_FALSE 1856
RESET
PUSH_CONSTANT 34
PUSH_CONSTANT 00
ENTER_FIELD
RESET
PUSH_SAVEMAP_WORD 00
PUSH_CONSTANT 063C
EQ
GOTO_IF_FALSE 1879
RESET
PUSH_CONSTANT 09
DIST_POINT
PUSH_CONSTANT 0100
LE
GOTO_IF_FALSE 1879
RESET
PUSH_SAVEMAP_WORD 00
PUSH_CONSTANT 063E
WRITE
RESET
PUSH_CONSTANT 34
PUSH_CONSTANT 00
ENTER_FIELD
RESET
PUSH_SAVEMAP_BIT 1C2E
PUSH_CONSTANT 01
WRITE
RETURN";

/// Listing and script of a function at 0x1000 that touches every memory bank.
pub const MEMORY_LISTING: &str = "\
RESET
PUSH_SAVEMAP_WORD 00
PUSH_CONSTANT 01
WRITE
RESET
PUSH_SAVEMAP_BYTE 55
PUSH_SAVEMAP_BYTE 56
WRITE
RESET
PUSH_SAVEMAP_BYTE 54
PUSH_SPECIAL_BYTE 07
WRITE
RESET
PUSH_SAVEMAP_BIT 03F1
PUSH_CONSTANT 01
WRITE
RESET
PUSH_SAVEMAP_BIT 03F2
PUSH_TEMP_BYTE 03
WRITE
RESET
PUSH_SAVEMAP_WORD 0388
PUSH_CONSTANT 02
WRITE
RESET
PUSH_SAVEMAP_WORD 0388
PUSH_SAVEMAP_WORD 038A
WRITE
RESET
PUSH_TEMP_BYTE 01
PUSH_CONSTANT 03
WRITE
RESET
PUSH_TEMP_WORD 04
PUSH_TEMP_WORD 06
WRITE
RESET
PUSH_SAVEMAP_BYTE 7E
PUSH_CONSTANT 02
EQ
GOTO_IF_FALSE 103F
STOP
RESET
PUSH_SAVEMAP_BYTE 7F
GOTO_IF_FALSE 1045
SET_PLAYER
RESET
PUSH_SAVEMAP_WORD 0388
PUSH_SAVEMAP_WORD 038A
EQ
GOTO_IF_FALSE 104E
STOP
RESET
PUSH_SAVEMAP_BIT 08E1
GOTO_IF_FALSE 1054
SET_PLAYER
RETURN";

pub const MEMORY_SCRIPT: &str = "\
Savemap.game_progress = 1
Savemap.chocobo_rating_1 = Savemap.chocobo_rating_2
Savemap[0xBF8].byte = Special.map_options
Savemap.chocobos_on_map.bit[1] = 1
Savemap.chocobos_on_map.bit[2] = Temp[3].byte
Savemap[0xF2C].word = 2
Savemap[0xF2C].word = Savemap[0xF2E].word
Temp[1].byte = 3
Temp[4].word = Temp[6].word
if Savemap.chocobos_on_map == 2 then
  Entity.stop()
end
if Savemap.vehicle_display then
  Entity.set_player_model()
end
if Savemap[0xF2C].word == Savemap[0xF2E].word then
  Entity.stop()
end
if Savemap[0xCC0].bit[1] then
  Entity.set_player_model()
end
return";

/// Compile to listing text, panicking on error.
pub fn compile(source: &str, start: u32) -> String {
    compile_to_listing(source, start).unwrap_or_else(|e| panic!("compile failed: {e}\n{source}"))
}
