//! Packet type tags.
//!
//! Every framed packet carries one of these in the last two bytes of its header.
//! Tags 15 and 22 have never been observed and are left unassigned.

pub const SYNC_REQUEST: u16 = 1;
pub const SYNC_RESULT: u16 = 2;
pub const FOOD: u16 = 3;
pub const EXERCISE: u16 = 4;
pub const FOOD_ENTRY: u16 = 5;
pub const EXERCISE_ENTRY: u16 = 6;
pub const CLIENT_FOOD_ENTRY: u16 = 7;
pub const CLIENT_EXERCISE_ENTRY: u16 = 8;
pub const MEASUREMENT_TYPES: u16 = 9;
pub const MEASUREMENT_VALUE: u16 = 10;
pub const MEAL_INGREDIENTS: u16 = 11;
pub const MASTER_ID_ASSIGNMENT: u16 = 12;
pub const USER_PROPERTY_UPDATE: u16 = 13;
pub const USER_REGISTRATION: u16 = 14;
pub const WATER_ENTRY: u16 = 16;
pub const DELETE_ITEM: u16 = 17;
pub const SEARCH_REQUEST: u16 = 18;
pub const SEARCH_RESPONSE: u16 = 19;
pub const FAILED_ITEM_CREATION: u16 = 20;
pub const ADD_DELETED_MOST_USED_FOOD: u16 = 21;
pub const DIARY_NOTE: u16 = 23;

/// Returns a human-readable name for a packet tag.
pub const fn type_name(tag: u16) -> &'static str {
    match tag {
        SYNC_REQUEST => "SyncRequest",
        SYNC_RESULT => "SyncResult",
        FOOD => "Food",
        EXERCISE => "Exercise",
        FOOD_ENTRY => "FoodEntry",
        EXERCISE_ENTRY => "ExerciseEntry",
        CLIENT_FOOD_ENTRY => "ClientFoodEntry",
        CLIENT_EXERCISE_ENTRY => "ClientExerciseEntry",
        MEASUREMENT_TYPES => "MeasurementTypes",
        MEASUREMENT_VALUE => "MeasurementValue",
        MEAL_INGREDIENTS => "MealIngredients",
        MASTER_ID_ASSIGNMENT => "MasterIdAssignment",
        USER_PROPERTY_UPDATE => "UserPropertyUpdate",
        USER_REGISTRATION => "UserRegistration",
        WATER_ENTRY => "WaterEntry",
        DELETE_ITEM => "DeleteItem",
        SEARCH_REQUEST => "SearchRequest",
        SEARCH_RESPONSE => "SearchResponse",
        FAILED_ITEM_CREATION => "FailedItemCreation",
        ADD_DELETED_MOST_USED_FOOD => "AddDeletedMostUsedFood",
        DIARY_NOTE => "DiaryNote",
        _ => "UNKNOWN",
    }
}

/// Returns true if the tag belongs to a known packet type.
pub fn is_known(tag: u16) -> bool {
    type_name(tag) != "UNKNOWN"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_tags() {
        assert_eq!(type_name(SYNC_RESULT), "SyncResult");
        assert_eq!(type_name(DIARY_NOTE), "DiaryNote");
        assert!(is_known(WATER_ENTRY));
    }

    #[test]
    fn gaps_are_unknown() {
        assert_eq!(type_name(15), "UNKNOWN");
        assert_eq!(type_name(22), "UNKNOWN");
        assert!(!is_known(0));
        assert!(!is_known(999));
    }
}
