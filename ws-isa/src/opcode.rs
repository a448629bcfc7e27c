use std::borrow::Cow;
use std::fmt;

use bitflags::bitflags;

/// Source-level namespace an opcode is exposed under (`Entity.stop()`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    System,
    Math,
    Entity,
    Point,
    Camera,
    Sound,
    Memory,
    Window,
    Player,
    Battle,
    Field,
    Savemap,
    Special,
    Temp,
}

impl Namespace {
    pub const ALL: [Namespace; 14] = [
        Namespace::System,
        Namespace::Math,
        Namespace::Entity,
        Namespace::Point,
        Namespace::Camera,
        Namespace::Sound,
        Namespace::Memory,
        Namespace::Window,
        Namespace::Player,
        Namespace::Battle,
        Namespace::Field,
        Namespace::Savemap,
        Namespace::Special,
        Namespace::Temp,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Namespace::System => "System",
            Namespace::Math => "Math",
            Namespace::Entity => "Entity",
            Namespace::Point => "Point",
            Namespace::Camera => "Camera",
            Namespace::Sound => "Sound",
            Namespace::Memory => "Memory",
            Namespace::Window => "Window",
            Namespace::Player => "Player",
            Namespace::Battle => "Battle",
            Namespace::Field => "Field",
            Namespace::Savemap => "Savemap",
            Namespace::Special => "Special",
            Namespace::Temp => "Temp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.name() == name)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Memory bank addressed by the `PUSH_<BANK>_*` family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bank {
    /// Persistent save data, addressed relative to [`SAVEMAP_BASE`](crate::symbols::SAVEMAP_BASE).
    Savemap,
    /// Scratch memory local to the running script.
    Temp,
    /// Engine status registers.
    Special,
}

impl Bank {
    pub const fn namespace(self) -> Namespace {
        match self {
            Bank::Savemap => Namespace::Savemap,
            Bank::Temp => Namespace::Temp,
            Bank::Special => Namespace::Special,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Savemap" => Some(Bank::Savemap),
            "Temp" => Some(Bank::Temp),
            "Special" => Some(Bank::Special),
            _ => None,
        }
    }

    /// Address the bank's operand 0 corresponds to in source text.
    pub const fn base(self) -> u32 {
        match self {
            Bank::Savemap => crate::symbols::SAVEMAP_BASE,
            Bank::Temp | Bank::Special => 0,
        }
    }
}

/// Access width of a memory push.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    Bit,
    Byte,
    Word,
}

impl Granularity {
    pub const fn name(self) -> &'static str {
        match self {
            Granularity::Bit => "bit",
            Granularity::Byte => "byte",
            Granularity::Word => "word",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bit" => Some(Granularity::Bit),
            "byte" => Some(Granularity::Byte),
            "word" => Some(Granularity::Word),
            _ => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a push opcode places on the evaluation stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PushKind {
    /// The inline operand itself.
    Constant,
    /// A memory read; the inline operand is the bank offset (bit index for `Bit`).
    Memory(Bank, Granularity),
}

/// Arithmetic, comparison and logic opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MathOp {
    Neg,
    Not,
    Mul,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    And,
    Or,
    LogicalAnd,
    LogicalOr,
}

impl MathOp {
    pub const fn is_unary(self) -> bool {
        matches!(self, MathOp::Neg | MathOp::Not)
    }
}

/// Closed classification of every opcode; decompiler and compiler dispatch on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpcodeKind {
    Nop,
    Reset,
    Push(PushKind),
    Math(MathOp),
    Write,
    Goto,
    GotoIfFalse,
    Return,
    CallFunction,
    /// Plain `Namespace.function(args...)` call.
    Generic,
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OpcodeFlags: u8 {
        /// Leaves a value on the evaluation stack.
        const PUSHES_RESULT = 1 << 0;
        /// Inline operand is an absolute code offset.
        const JUMP = 1 << 1;
        /// Pops a condition before jumping.
        const CONDITIONAL = 1 << 2;
        /// Ends the function.
        const TERMINATOR = 1 << 3;
        /// Literal arguments are entity (model) ids.
        const MODEL_ARG = 1 << 4;
    }
}

/// Static description of one opcode.
#[derive(Debug, PartialEq, Eq)]
pub struct OpcodeDef {
    pub code: u16,
    pub mnemonic: &'static str,
    pub namespace: Namespace,
    pub name: &'static str,
    /// Values popped from the evaluation stack.
    pub stack_params: u8,
    /// Words following the opcode in the code stream.
    pub inline_params: u8,
    pub kind: OpcodeKind,
    pub flags: OpcodeFlags,
    pub description: &'static str,
}

impl OpcodeDef {
    #[inline]
    pub const fn pushes_result(&self) -> bool {
        self.flags.contains(OpcodeFlags::PUSHES_RESULT)
    }

    #[inline]
    pub const fn is_jump(&self) -> bool {
        self.flags.contains(OpcodeFlags::JUMP)
    }

    /// Whether source code can reach this opcode through `Namespace.name(...)`.
    pub const fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            OpcodeKind::Nop
                | OpcodeKind::Reset
                | OpcodeKind::Math(_)
                | OpcodeKind::Write
                | OpcodeKind::Generic
        )
    }
}

/// Opcode values the tools refer to by name.
pub mod op {
    pub const NOP: u16 = 0x000;
    pub const NEG: u16 = 0x015;
    pub const NOT: u16 = 0x017;
    pub const MUL: u16 = 0x030;
    pub const ADD: u16 = 0x040;
    pub const SUB: u16 = 0x041;
    pub const SHL: u16 = 0x050;
    pub const SHR: u16 = 0x051;
    pub const LT: u16 = 0x060;
    pub const GT: u16 = 0x061;
    pub const LE: u16 = 0x062;
    pub const GE: u16 = 0x063;
    pub const EQ: u16 = 0x070;
    pub const AND: u16 = 0x080;
    pub const OR: u16 = 0x0A0;
    pub const LAND: u16 = 0x0B0;
    pub const LOR: u16 = 0x0C0;
    pub const WRITE: u16 = 0x0E0;
    pub const RESET: u16 = 0x100;
    pub const PUSH_CONSTANT: u16 = 0x110;
    pub const PUSH_SAVEMAP_BIT: u16 = 0x114;
    pub const PUSH_SPECIAL_BIT: u16 = 0x117;
    pub const PUSH_SAVEMAP_BYTE: u16 = 0x118;
    pub const PUSH_TEMP_BYTE: u16 = 0x119;
    pub const PUSH_SPECIAL_BYTE: u16 = 0x11B;
    pub const PUSH_SAVEMAP_WORD: u16 = 0x11C;
    pub const PUSH_TEMP_WORD: u16 = 0x11D;
    pub const PUSH_SPECIAL_WORD: u16 = 0x11F;
    pub const GOTO: u16 = 0x200;
    pub const GOTO_IF_FALSE: u16 = 0x201;
    pub const RETURN: u16 = 0x203;
    /// First opcode of the `CALL_FN_<n>` family (`n = code - CALL_FN_BASE`).
    pub const CALL_FN_BASE: u16 = 0x204;
    /// One past the last `CALL_FN_<n>` opcode.
    pub const CALL_FN_END: u16 = 0x300;
    pub const WAIT_FRAMES: u16 = 0x305;
    pub const WAIT: u16 = 0x306;
}

const fn mem(bank: Bank, granularity: Granularity) -> OpcodeKind {
    OpcodeKind::Push(PushKind::Memory(bank, granularity))
}

macro_rules! opcode_table {
    ($(
        $code:literal => $mnemonic:literal, $ns:ident, $name:literal, $stack:literal, $inline:literal,
        $kind:expr, [$($flag:ident),*], $desc:literal;
    )*) => {
        &[$(
            OpcodeDef {
                code: $code,
                mnemonic: $mnemonic,
                namespace: Namespace::$ns,
                name: $name,
                stack_params: $stack,
                inline_params: $inline,
                kind: $kind,
                flags: OpcodeFlags::empty()$(.union(OpcodeFlags::$flag))*,
                description: $desc,
            },
        )*]
    };
}

use Bank::{Savemap, Special, Temp};
use Granularity::{Bit, Byte, Word};
use OpcodeKind as K;

/// Every fixed opcode, sorted by code. The `CALL_FN_<n>` family is described
/// once by [`CALL_FUNCTION`].
pub static OPCODES: &[OpcodeDef] = opcode_table! {
    0x000 => "NOP", System, "noop", 0, 0, K::Nop, [], "No operation";
    0x015 => "NEG", Math, "negate", 1, 0, K::Math(MathOp::Neg), [PUSHES_RESULT], "Negate value on stack";
    0x017 => "NOT", Math, "not", 1, 0, K::Math(MathOp::Not), [PUSHES_RESULT], "Logical NOT of value on stack";
    0x018 => "DIST_POINT", Entity, "distance_to_point", 1, 0, K::Generic, [PUSHES_RESULT], "Get distance from active entity to a point";
    0x019 => "DIST_MODEL", Entity, "distance_to_entity", 1, 0, K::Generic, [PUSHES_RESULT, MODEL_ARG], "Get distance from active entity to another";
    0x01B => "DIR_POINT", Entity, "direction_to_point", 1, 0, K::Generic, [PUSHES_RESULT], "Get direction from active entity to a point";
    0x030 => "MUL", Math, "multiply", 2, 0, K::Math(MathOp::Mul), [PUSHES_RESULT], "Multiply two values on stack";
    0x040 => "ADD", Math, "add", 2, 0, K::Math(MathOp::Add), [PUSHES_RESULT], "Add two values on stack";
    0x041 => "SUB", Math, "subtract", 2, 0, K::Math(MathOp::Sub), [PUSHES_RESULT], "Subtract two values on stack";
    0x050 => "SHL", Math, "shift_left", 2, 0, K::Math(MathOp::Shl), [PUSHES_RESULT], "Shift left";
    0x051 => "SHR", Math, "shift_right", 2, 0, K::Math(MathOp::Shr), [PUSHES_RESULT], "Shift right";
    0x060 => "LT", Math, "less_than", 2, 0, K::Math(MathOp::Lt), [PUSHES_RESULT], "Less than comparison";
    0x061 => "GT", Math, "greater_than", 2, 0, K::Math(MathOp::Gt), [PUSHES_RESULT], "Greater than comparison";
    0x062 => "LE", Math, "less_equal", 2, 0, K::Math(MathOp::Le), [PUSHES_RESULT], "Less than or equal comparison";
    0x063 => "GE", Math, "greater_equal", 2, 0, K::Math(MathOp::Ge), [PUSHES_RESULT], "Greater than or equal comparison";
    0x070 => "EQ", Math, "equal", 2, 0, K::Math(MathOp::Eq), [PUSHES_RESULT], "Equal comparison";
    0x080 => "AND", Math, "bitwise_and", 2, 0, K::Math(MathOp::And), [PUSHES_RESULT], "Bitwise AND";
    0x0A0 => "OR", Math, "bitwise_or", 2, 0, K::Math(MathOp::Or), [PUSHES_RESULT], "Bitwise OR";
    0x0B0 => "LAND", Math, "logical_and", 2, 0, K::Math(MathOp::LogicalAnd), [PUSHES_RESULT], "Logical AND";
    0x0C0 => "LOR", Math, "logical_or", 2, 0, K::Math(MathOp::LogicalOr), [PUSHES_RESULT], "Logical OR";
    0x0E0 => "WRITE", Memory, "write_bank", 2, 0, K::Write, [], "Write a value to a memory bank";
    0x100 => "RESET", System, "reset_stack", 0, 0, K::Reset, [], "Reset the stack";
    0x110 => "PUSH_CONSTANT", Memory, "push_constant", 0, 1, K::Push(PushKind::Constant), [PUSHES_RESULT], "Push a constant value onto the stack";
    0x114 => "PUSH_SAVEMAP_BIT", Savemap, "bit", 0, 1, mem(Savemap, Bit), [PUSHES_RESULT], "Read a bit from Bank 0";
    0x117 => "PUSH_SPECIAL_BIT", Special, "bit", 0, 1, mem(Special, Bit), [PUSHES_RESULT], "Read a bit from the special register";
    0x118 => "PUSH_SAVEMAP_BYTE", Savemap, "byte", 0, 1, mem(Savemap, Byte), [PUSHES_RESULT], "Read a byte from Bank 0";
    0x119 => "PUSH_TEMP_BYTE", Temp, "byte", 0, 1, mem(Temp, Byte), [PUSHES_RESULT], "Read a byte from Bank 1";
    0x11B => "PUSH_SPECIAL_BYTE", Special, "byte", 0, 1, mem(Special, Byte), [PUSHES_RESULT], "Read a byte from the special register";
    0x11C => "PUSH_SAVEMAP_WORD", Savemap, "word", 0, 1, mem(Savemap, Word), [PUSHES_RESULT], "Read a word (2 bytes) from Bank 0";
    0x11D => "PUSH_TEMP_WORD", Temp, "word", 0, 1, mem(Temp, Word), [PUSHES_RESULT], "Read a word (2 bytes) from Bank 1";
    0x11F => "PUSH_SPECIAL_WORD", Special, "word", 0, 1, mem(Special, Word), [PUSHES_RESULT], "Read a word (2 bytes) from the special register";
    0x200 => "GOTO", System, "goto", 0, 1, K::Goto, [JUMP], "Unconditional jump to another location in code";
    0x201 => "GOTO_IF_FALSE", System, "goto_if_false", 1, 1, K::GotoIfFalse, [JUMP, CONDITIONAL], "Conditional branch to another location in code if the condition result on the stack is false";
    0x203 => "RETURN", System, "return", 0, 0, K::Return, [TERMINATOR], "Return from a function call";
    0x300 => "LOAD_MODEL", Entity, "load_model", 1, 0, K::Generic, [MODEL_ARG], "Load a model for an entity";
    0x302 => "SET_PLAYER", Entity, "set_player_model", 0, 0, K::Generic, [], "Set the player's entity model";
    0x303 => "SET_SPEED", Entity, "set_movespeed", 1, 0, K::Generic, [], "Set the active entity's movement speed";
    0x304 => "SET_DIR", Entity, "set_direction_facing", 1, 0, K::Generic, [], "Set direction and facing";
    0x305 => "WAIT_FRAMES", System, "wait_frames", 1, 0, K::Generic, [PUSHES_RESULT], "Wait for a specified number of frames";
    0x306 => "WAIT", System, "wait", 1, 0, K::Generic, [], "Wait for the next frame";
    0x307 => "SET_CONTROLS", System, "set_control_lock", 1, 0, K::Generic, [], "Lock/unlock player controls";
    0x308 => "SET_MESH_POS", Entity, "set_mesh_coords", 2, 0, K::Generic, [], "Set active entity's mesh coordinates";
    0x309 => "SET_LOCAL_POS", Entity, "set_coords_in_mesh", 2, 0, K::Generic, [], "Set active entity's coordinates within mesh";
    0x30A => "SET_VERT_SPEED", Entity, "set_vertical_speed", 1, 0, K::Generic, [], "Set active entity's vertical speed";
    0x30B => "SET_Y_OFFSET", Entity, "set_y_offset", 1, 0, K::Generic, [], "Set active entity's Y offset";
    0x30C => "ENTER_VEHICLE", Entity, "enter_vehicle", 0, 0, K::Generic, [], "Make active entity enter a vehicle";
    0x30D => "STOP", Entity, "stop", 0, 0, K::Generic, [], "Stop the active entity's movement";
    0x30E => "PLAY_ANIM", Entity, "play_animation", 2, 0, K::Generic, [], "Play an animation on the active entity";
    0x310 => "SET_POINT", Point, "set_active", 2, 0, K::Generic, [], "Set the active point";
    0x311 => "SET_POINT_MESH", Point, "set_mesh_coords", 2, 0, K::Generic, [], "Set point mesh coordinates";
    0x312 => "SET_POINT_LOCAL", Point, "set_coords_in_mesh", 2, 0, K::Generic, [], "Set point coordinates within mesh";
    0x313 => "SET_TERRAIN_COLOR", Point, "set_terrain_color", 3, 0, K::Generic, [], "Set the terrain color at a point";
    0x314 => "SET_LIGHT_DROPOFF", Point, "set_dropoff_params", 2, 0, K::Generic, [], "Configure dropoff parameters for a point";
    0x315 => "SET_SKY_TOP", Point, "set_sky_top_color", 3, 0, K::Generic, [], "Set the top color of the sky";
    0x316 => "SET_SKY_BOTTOM", Point, "set_sky_bottom_color", 3, 0, K::Generic, [], "Set the bottom color of the sky";
    0x317 => "BATTLE", System, "trigger_battle", 1, 0, K::Generic, [], "Trigger a battle by ID";
    0x318 => "ENTER_FIELD", System, "enter_field", 2, 0, K::Generic, [], "Transition to a field scene";
    0x319 => "SET_MAP_OPTIONS", System, "set_map_options", 1, 0, K::Generic, [], "Configure map-wide settings";
    0x31B => "NOP_ARG", System, "noop_with_arg", 1, 0, K::Generic, [], "No operation (placeholder)";
    0x31C => "SET_CAM_LOCK", Camera, "set_tilt_zoom_status", 1, 0, K::Generic, [], "Set camera tilt/zoom state";
    0x31D => "PLAY_SFX", Sound, "play_sfx", 1, 0, K::Generic, [], "Play a sound effect by ID";
    0x31F => "SET_CAM_SPEED", Camera, "set_rotation_speed", 1, 0, K::Generic, [], "Adjust camera rotation speed";
    0x320 => "RESET_ZOLOM", System, "reset_zolom", 0, 0, K::Generic, [], "Reset Midgar Zolom state if disabled";
    0x321 => "FACE_POINT", Entity, "face_point", 1, 0, K::Generic, [], "Make active entity face a point";
    0x324 => "SET_WINDOW_SIZE", Window, "set_dimensions", 4, 0, K::Generic, [], "Set window position and size";
    0x325 => "SET_MESSAGE", Window, "set_message", 1, 0, K::Generic, [], "Set the window's message text by ID";
    0x326 => "SET_PROMPT", Window, "set_prompt", 3, 0, K::Generic, [], "Set a prompt in the window";
    0x327 => "WAIT_PROMPT", Window, "wait_for_prompt_ack", 0, 0, K::Generic, [], "Wait for the player to acknowledge a prompt";
    0x328 => "SET_MOVE_DIR", Entity, "set_movement_direction", 1, 0, K::Generic, [], "Set entity movement direction";
    0x329 => "SET_CAM_TILT", Camera, "set_tilt_speed", 1, 0, K::Generic, [], "Adjust camera tilt speed";
    0x32A => "SET_CAM_ZOOM", Camera, "set_zoom_speed", 1, 0, K::Generic, [], "Adjust camera zoom speed";
    0x32B => "SET_ENCOUNTERS", System, "set_encounters", 1, 0, K::Generic, [], "Enable/disable random encounters";
    0x32C => "SET_WINDOW_STYLE", Window, "set_params", 2, 0, K::Generic, [], "Configure window style and behavior";
    0x32D => "WAIT_WINDOW", Window, "wait_until_ready", 0, 0, K::Generic, [], "Wait until the window is ready";
    0x32E => "WAIT_DISMISS", Window, "wait_for_acknowledge", 0, 0, K::Generic, [], "Wait for the player to dismiss the window";
    0x32F => "SET_PLAYER_DIR", Player, "set_direction", 1, 0, K::Generic, [], "Set the player's facing direction";
    0x330 => "SET_ENTITY", Player, "set_active_entity", 1, 0, K::Generic, [MODEL_ARG], "Set the active entity (e.g., player)";
    0x331 => "EXIT_VEHICLE", Player, "exit_vehicle", 0, 0, K::Generic, [], "Make the player exit a vehicle";
    0x332 => "CHOCOBO_RUN", Player, "chocobo_run_away", 0, 0, K::Generic, [], "Trigger chocobo runaway behavior";
    0x333 => "FACE_MODEL", Entity, "rotate_to_model", 2, 0, K::Generic, [MODEL_ARG], "Rotate active entity to face a model";
    0x334 => "WAIT_FUNC", System, "wait_for_function", 0, 0, K::Generic, [], "Wait until a function completes";
    0x336 => "SET_WALK_SPEED", Entity, "set_walk_speed", 1, 0, K::Generic, [], "Set entity walking speed";
    0x339 => "HIDE_MODEL", Entity, "hide_model", 0, 0, K::Generic, [], "Hide the active entity's model";
    0x33A => "SET_VERT_SPEED2", Entity, "set_vertical_speed_2", 1, 0, K::Generic, [], "Set an alternate vertical speed";
    0x33B => "FADE_OUT", System, "fade_out", 2, 0, K::Generic, [], "Fade the screen to black";
    0x33C => "SET_FIELD_ENTRY", System, "set_field_entry", 0, 0, K::Generic, [], "Set field scene entry point";
    0x33D => "SET_FIELD_ENTRY_ID", System, "set_field_entry_by_id", 1, 0, K::Generic, [], "Set field entry point by ID";
    0x33E => "PLAY_MUSIC", Sound, "play_music", 1, 0, K::Generic, [], "Play a music track by ID";
    0x347 => "MOVE_TO_MODEL", Entity, "move_to_entity", 1, 0, K::Generic, [MODEL_ARG], "Move active entity to another entity";
    0x348 => "FADE_IN", System, "fade_in", 2, 0, K::Generic, [], "Fade the screen from black";
    0x349 => "SET_PROGRESS", System, "set_world_progress", 1, 0, K::Generic, [], "Update the game's progress flags";
    0x34A => "PLAY_LAYER_ANIM", System, "play_layer_animation", 1, 0, K::Generic, [], "Play an animation on a layer";
    0x34B => "SET_CHOCOBO", Player, "set_chocobo_type", 1, 0, K::Generic, [], "Set the player's chocobo type";
    0x34C => "SET_SUBMARINE", Player, "set_submarine_color", 1, 0, K::Generic, [], "Set the submarine's color";
    0x34D => "SHOW_LAYER", System, "show_layer", 3, 0, K::Generic, [], "Show an animation layer";
    0x34E => "HIDE_LAYER", System, "hide_layer", 1, 0, K::Generic, [], "Hide an animation layer";
    0x34F => "SET_Y_POS", Entity, "set_y_position", 1, 0, K::Generic, [], "Set active entity's Y position";
    0x350 => "SHOW_METEOR", System, "show_meteor", 1, 0, K::Generic, [], "Show/hide the meteor in the sky";
    0x351 => "SET_MUSIC_VOL", Sound, "set_music_volume", 1, 0, K::Generic, [], "Adjust the music volume";
    0x352 => "SHAKE_CAM", Camera, "shake", 1, 0, K::Generic, [], "Enable/disable camera shaking";
    0x353 => "ADJUST_POS", Entity, "adjust_position_outside_vehicle", 2, 0, K::Generic, [], "Adjust position after exiting vehicle";
    0x354 => "SET_VEHICLE_USABLE", System, "set_vehicle_usable", 1, 0, K::Generic, [], "Enable/disable vehicle usage";
    0x355 => "SET_BATTLE_TIMER", System, "set_battle_timer", 1, 0, K::Generic, [], "Set the battle timer value";
};

/// Shared description of the `CALL_FN_<n>` opcodes (`0x204 + n`).
pub static CALL_FUNCTION: OpcodeDef = OpcodeDef {
    code: op::CALL_FN_BASE,
    mnemonic: "CALL_FN_",
    namespace: Namespace::System,
    name: "call_function",
    stack_params: 1,
    inline_params: 0,
    kind: OpcodeKind::CallFunction,
    flags: OpcodeFlags::empty(),
    description: "Call another script function by ID",
};

/// A decoded opcode: either a fixed table entry or a `CALL_FN_<n>` with its
/// function number folded into the opcode value.
#[derive(Clone, Copy, Debug)]
pub enum Opcode {
    Def(&'static OpcodeDef),
    CallFunction(u16),
}

impl Opcode {
    /// Numeric opcode value as stored in the code stream.
    pub const fn code(&self) -> u16 {
        match self {
            Opcode::Def(def) => def.code,
            Opcode::CallFunction(n) => op::CALL_FN_BASE + *n,
        }
    }

    pub fn def(&self) -> &'static OpcodeDef {
        match self {
            Opcode::Def(def) => def,
            Opcode::CallFunction(_) => &CALL_FUNCTION,
        }
    }

    pub fn kind(&self) -> OpcodeKind {
        self.def().kind
    }

    pub fn mnemonic(&self) -> Cow<'static, str> {
        match self {
            Opcode::Def(def) => Cow::Borrowed(def.mnemonic),
            Opcode::CallFunction(n) => Cow::Owned(format!("CALL_FN_{n}")),
        }
    }

    /// Inline operand words following the opcode.
    pub fn inline_params(&self) -> usize {
        match self {
            Opcode::Def(def) => def.inline_params as usize,
            Opcode::CallFunction(_) => 0,
        }
    }

    /// Instruction width in words.
    pub fn width(&self) -> u32 {
        1 + self.inline_params() as u32
    }
}

impl PartialEq for Opcode {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Opcode {}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Def(def) => f.write_str(def.mnemonic),
            Opcode::CallFunction(n) => write!(f, "CALL_FN_{n}"),
        }
    }
}

/// Look up an opcode by its numeric value.
///
/// ```
/// use ws_isa::{lookup, Opcode};
///
/// assert_eq!(lookup(0x110).unwrap().mnemonic(), "PUSH_CONSTANT");
/// assert_eq!(lookup(0x205), Some(Opcode::CallFunction(1)));
/// assert!(lookup(0x001).is_none());
/// ```
pub fn lookup(code: u16) -> Option<Opcode> {
    if (op::CALL_FN_BASE..op::CALL_FN_END).contains(&code) {
        return Some(Opcode::CallFunction(code - op::CALL_FN_BASE));
    }
    OPCODES
        .binary_search_by_key(&code, |def| def.code)
        .ok()
        .map(|idx| Opcode::Def(&OPCODES[idx]))
}

/// Look up an opcode by listing mnemonic, including `CALL_FN_<n>`.
pub fn lookup_mnemonic(mnemonic: &str) -> Option<Opcode> {
    if let Some(n) = mnemonic.strip_prefix(CALL_FUNCTION.mnemonic) {
        if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        return n.parse::<u16>().ok().and_then(call_function);
    }
    OPCODES
        .iter()
        .find(|def| def.mnemonic == mnemonic)
        .map(Opcode::Def)
}

/// The `CALL_FN_<n>` opcode, if `n` is encodable.
pub fn call_function(n: u16) -> Option<Opcode> {
    let code = op::CALL_FN_BASE.checked_add(n)?;
    (code < op::CALL_FN_END).then_some(Opcode::CallFunction(n))
}

/// Find the opcode reachable from source as `namespace.name(...)`.
pub fn lookup_function(namespace: &str, name: &str) -> Option<&'static OpcodeDef> {
    let namespace = Namespace::from_name(namespace)?;
    OPCODES
        .iter()
        .find(|def| def.is_callable() && def.namespace == namespace && def.name == name)
}

/// First table opcode of `kind`. Every kind except `Generic` has exactly
/// one; `CallFunction` has none since its opcodes carry a function number.
pub fn lookup_kind(kind: OpcodeKind) -> Option<Opcode> {
    OPCODES.iter().find(|def| def.kind == kind).map(Opcode::Def)
}

/// All opcode descriptions in code order, [`CALL_FUNCTION`] included.
pub fn table() -> impl Iterator<Item = &'static OpcodeDef> {
    let split = OPCODES.partition_point(|def| def.code < op::CALL_FN_BASE);
    OPCODES[..split]
        .iter()
        .chain(std::iter::once(&CALL_FUNCTION))
        .chain(OPCODES[split..].iter())
}
