use ws_decompiler::{Options, decompile_listing};

/// Offset of the highwind-bridge script most of the cases come from.
pub const BRIDGE_OFFSET: u32 = 0x181E;

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

/// Decompile without debug output, panicking on error.
pub fn decompile(listing: &str, start: u32) -> String {
    decompile_listing(listing, start, Options::default())
        .unwrap_or_else(|e| panic!("decompile failed: {e}\n{listing}"))
}
