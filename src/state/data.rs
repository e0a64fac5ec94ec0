/// Shared data structures for the catalog
///
/// These structs represent the data model that flows between
/// the XML layer, the catalog arena and the presentation layer.

use std::fmt;

/// Which top-level branch of the catalog an entry is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Creatures (XML record `Mob`)
    Creature,
    /// Wearable equipment (XML record `Equip`)
    Equipment,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Creature, Category::Equipment];

    /// Tag of the synthetic root node (-1 creature, -2 equipment)
    pub fn root_tag(self) -> i32 {
        match self {
            Category::Creature => -1,
            Category::Equipment => -2,
        }
    }

    /// XML element name used for records of this category
    pub fn xml_tag(self) -> &'static str {
        match self {
            Category::Creature => "Mob",
            Category::Equipment => "Equip",
        }
    }

    /// Prefix used for exported file names
    pub fn export_label(self) -> &'static str {
        match self {
            Category::Creature => "Mob",
            Category::Equipment => "Equipment",
        }
    }

    /// Index into `Category::ALL`
    pub fn index(self) -> usize {
        match self {
            Category::Creature => 0,
            Category::Equipment => 1,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Creature => write!(f, "Mobs"),
            Category::Equipment => write!(f, "Equipment"),
        }
    }
}

/// Selects which action-name table applies to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Monster = 0,
    Sea = 1,
    Animal = 2,
    Human = 3,
}

/// Persisted type tag for "Human table, filed under Equipment"
pub const EQUIPMENT_TYPE_TAG: i64 = 4;

impl TypeClass {
    /// Interpret a persisted type tag.
    ///
    /// Tag 4 is the Human table filed under Equipment; 0..=3 carry no
    /// category of their own.
    pub fn from_tag(tag: i64) -> Option<(TypeClass, Option<Category>)> {
        let class = match tag {
            0 => TypeClass::Monster,
            1 => TypeClass::Sea,
            2 => TypeClass::Animal,
            3 => TypeClass::Human,
            EQUIPMENT_TYPE_TAG => return Some((TypeClass::Human, Some(Category::Equipment))),
            _ => return None,
        };
        Some((class, None))
    }

    /// Type tag written back to disk for an entry of this class in `category`
    pub fn to_tag(self, category: Category) -> i64 {
        match (self, category) {
            (TypeClass::Human, Category::Equipment) => EQUIPMENT_TYPE_TAG,
            (class, _) => class as i64,
        }
    }

    /// The action names of this class, indexed by action
    pub fn action_names(self) -> &'static [&'static str] {
        ACTION_NAMES[self as usize]
    }

    /// Name of `action` in this class's table
    pub fn action_name(self, action: usize) -> Option<&'static str> {
        self.action_names().get(action).copied()
    }
}

/// Action names per type class (Monster, Sea, Animal, Human)
pub static ACTION_NAMES: [&[&str]; 4] = [
    // Monster
    &[
        "Walk", "Idle", "Die1", "Die2", "Attack1", "Attack2", "Attack3", "AttackBow",
        "AttackCrossBow", "AttackThrow", "GetHit", "Pillage", "Stomp", "Cast2", "Cast3",
        "BlockRight", "BlockLeft", "Idle", "Fidget", "Fly", "TakeOff", "GetHitInAir",
    ],
    // Sea
    &["Walk", "Run", "Idle", "Idle", "Fidget", "Attack1", "Attack2", "GetHit", "Die1"],
    // Animal
    &[
        "Walk", "Run", "Idle", "Eat", "Alert", "Attack1", "Attack2", "GetHit", "Die1", "Idle",
        "Fidget", "LieDown", "Die2",
    ],
    // Human
    &[
        "Walk_01", "WalkStaff_01", "Run_01", "RunStaff_01", "Idle_01", "Idle_01",
        "Fidget_Yawn_Stretch_01", "CombatIdle1H_01", "CombatIdle1H_01", "AttackSlash1H_01",
        "AttackPierce1H_01", "AttackBash1H_01", "AttackBash2H_01", "AttackSlash2H_01",
        "AttackPierce2H_01", "CombatAdvance_1H_01", "Spell1", "Spell2", "AttackBow_01",
        "AttackCrossbow_01", "GetHit_Fr_Hi_01", "Die_Hard_Fwd_01", "Die_Hard_Back_01",
        "Horse_Walk_01", "Horse_Run_01", "Horse_Idle_01", "Horse_Attack1H_SlashRight_01",
        "Horse_AttackBow_01", "Horse_AttackCrossbow_01", "Horse_Attack2H_SlashRight_01",
        "Block_Shield_Hard_01", "Punch_Punch_Jab_01", "Bow_Lesser_01", "Salute_Armed1h_01",
        "Ingest_Eat_01",
    ],
];

/// An action present in the archive for a given entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinedAction {
    pub index: usize,
    pub name: &'static str,
}

impl fmt::Display for DefinedAction {
    /// Rendered as "4 Attack1", the way the tree lists actions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index, self.name)
    }
}

/// Stable handle of an entry in the catalog arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(pub(crate) u64);

/// Represents a single body listed in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Body (graphic) id in the archive
    pub id: u32,
    /// Branch the entry is filed under
    pub category: Category,
    /// Which action-name table applies
    pub type_class: TypeClass,
    /// Displayed name
    pub name: String,
    /// Actions the archive actually has data for, ascending by index
    pub actions: Vec<DefinedAction>,
    /// Archive file the body lives in (tooltip only)
    pub file_name: Option<String>,
}

impl CatalogEntry {
    /// Type tag this entry is persisted with
    pub fn type_tag(&self) -> i64 {
        self.type_class.to_tag(self.category)
    }

    pub fn has_action(&self, index: usize) -> bool {
        self.actions.iter().any(|a| a.index == index)
    }
}
