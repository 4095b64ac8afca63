//! Foods, their serving options, diary food entries, and meal ingredients.

use chrono::NaiveDate;
use mfpsync_wire::{tag, WireReader, WireWriter};

use crate::error::Result;
use crate::flags::Flag;
use crate::packet::{read_count_i16, read_count_i32, write_count_i16, write_count_i32, Body};

/// The nutrients stored on every food, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Nutrient {
    Calories,
    Fat,
    SaturatedFat,
    PolyunsaturatedFat,
    MonounsaturatedFat,
    TransFat,
    Cholesterol,
    Sodium,
    Potassium,
    Carbohydrates,
    Fiber,
    Sugar,
    Protein,
    VitaminA,
    VitaminC,
    Calcium,
    Iron,
}

pub const NUTRIENT_COUNT: usize = 17;

impl Nutrient {
    pub const ALL: [Nutrient; NUTRIENT_COUNT] = [
        Nutrient::Calories,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::PolyunsaturatedFat,
        Nutrient::MonounsaturatedFat,
        Nutrient::TransFat,
        Nutrient::Cholesterol,
        Nutrient::Sodium,
        Nutrient::Potassium,
        Nutrient::Carbohydrates,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Protein,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::Calcium,
        Nutrient::Iron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Fat => "fat",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::PolyunsaturatedFat => "polyunsaturated_fat",
            Nutrient::MonounsaturatedFat => "monounsaturated_fat",
            Nutrient::TransFat => "trans_fat",
            Nutrient::Cholesterol => "cholesterol",
            Nutrient::Sodium => "sodium",
            Nutrient::Potassium => "potassium",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
            Nutrient::Protein => "protein",
            Nutrient::VitaminA => "vitamin_a",
            Nutrient::VitaminC => "vitamin_c",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
        }
    }
}

/// Per-food nutrient values, one binary32 float per [`Nutrient`].
///
/// NaN marks a value the server did not provide.
///
/// Equality compares bit patterns, so an absent value equals itself.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nutrients([f32; NUTRIENT_COUNT]);

impl PartialEq for Nutrients {
    fn eq(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Nutrients {
    pub fn get(&self, nutrient: Nutrient) -> f32 {
        self.0[nutrient as usize]
    }

    /// The value, or `None` if the server left it unset.
    pub fn value(&self, nutrient: Nutrient) -> Option<f32> {
        Some(self.get(nutrient)).filter(|value| !value.is_nan())
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f32) {
        self.0[nutrient as usize] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f32)> + '_ {
        Nutrient::ALL.into_iter().zip(self.0.iter().copied())
    }

    fn read(reader: &mut WireReader) -> Result<Self> {
        let mut values = [0f32; NUTRIENT_COUNT];
        for value in &mut values {
            *value = reader.read_f32()?;
        }
        Ok(Self(values))
    }

    fn write(&self, writer: &mut WireWriter) {
        for value in self.0 {
            writer.write_f32(value);
        }
    }
}

impl From<[f32; NUTRIENT_COUNT]> for Nutrients {
    fn from(values: [f32; NUTRIENT_COUNT]) -> Self {
        Self(values)
    }
}

/// A serving option of a food, e.g. "1 cup" weighing 240 g.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodPortion {
    pub amount: f32,
    pub gram_weight: f32,
    pub description: String,
    pub fraction_int: i16,
}

impl FoodPortion {
    /// True when the amount is displayed as a fraction.
    pub fn is_fraction(&self) -> bool {
        self.fraction_int != 0
    }

    pub fn set_fraction(&mut self, enabled: bool) {
        self.fraction_int = i16::from(enabled);
    }

    pub fn read(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            amount: reader.read_f32()?,
            gram_weight: reader.read_f32()?,
            description: reader.read_string()?,
            fraction_int: reader.read_i16()?,
        })
    }

    pub fn write(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_f32(self.amount);
        writer.write_f32(self.gram_weight);
        writer.write_string(&self.description)?;
        writer.write_i16(self.fraction_int);
        Ok(())
    }
}

/// `food_type` value of a meal.
pub const MEAL_FOOD_TYPE: i16 = 1;

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Food {
    pub master_food_id: i32,
    pub owner_user_master_id: i32,
    pub original_master_id: i32,
    pub description: String,
    pub brand: String,
    pub flags: i32,
    pub nutrients: Nutrients,
    /// Weight of the food the nutrient values refer to.
    pub grams: f32,
    pub food_type: i16,
    pub portions: Vec<FoodPortion>,
}

impl Food {
    pub const PUBLIC: Flag<i32> = Flag::new(0x1);
    pub const DELETED: Flag<i32> = Flag::new(0x2);

    pub fn is_public(&self) -> bool {
        Self::PUBLIC.is_set(self.flags)
    }

    pub fn set_public(&mut self, enabled: bool) {
        Self::PUBLIC.apply(&mut self.flags, enabled);
    }

    pub fn is_deleted(&self) -> bool {
        Self::DELETED.is_set(self.flags)
    }

    pub fn set_deleted(&mut self, enabled: bool) {
        Self::DELETED.apply(&mut self.flags, enabled);
    }

    pub fn is_meal(&self) -> bool {
        self.food_type == MEAL_FOOD_TYPE
    }

    pub fn set_meal(&mut self, meal: bool) {
        self.food_type = if meal { MEAL_FOOD_TYPE } else { 0 };
    }
}

impl Body for Food {
    const TAG: u16 = tag::FOOD;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        let master_food_id = reader.read_i32()?;
        let owner_user_master_id = reader.read_i32()?;
        let original_master_id = reader.read_i32()?;
        let description = reader.read_string()?;
        let brand = reader.read_string()?;
        let flags = reader.read_i32()?;
        let nutrients = Nutrients::read(reader)?;
        let grams = reader.read_f32()?;
        let food_type = reader.read_i16()?;

        let count = read_count_i16(reader)?;
        let portions = (0..count)
            .map(|_| FoodPortion::read(reader))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            master_food_id,
            owner_user_master_id,
            original_master_id,
            description,
            brand,
            flags,
            nutrients,
            grams,
            food_type,
            portions,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i32(self.master_food_id);
        writer.write_i32(self.owner_user_master_id);
        writer.write_i32(self.original_master_id);
        writer.write_string(&self.description)?;
        writer.write_string(&self.brand)?;
        writer.write_i32(self.flags);
        self.nutrients.write(writer);
        writer.write_f32(self.grams);
        writer.write_i16(self.food_type);
        write_count_i16(writer, self.portions.len())?;
        for portion in &self.portions {
            portion.write(writer)?;
        }
        Ok(())
    }
}

/// A food logged in the diary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodEntry {
    pub master_food_entry_id: i64,
    pub food: Food,
    pub date: NaiveDate,
    pub meal_name: String,
    /// Number of chosen portions eaten.
    pub quantity: f32,
    /// Index into `food.portions`.
    pub weight_index: i32,
}

impl FoodEntry {
    /// The chosen serving option.
    pub fn portion(&self) -> Option<&FoodPortion> {
        let index = usize::try_from(self.weight_index).ok()?;
        self.food.portions.get(index)
    }

    /// Multiplier from the food's reference weight to the amount eaten.
    pub fn scale(&self) -> Option<f32> {
        let portion = self.portion()?;
        if self.food.grams == 0.0 {
            return None;
        }
        Some(self.quantity * portion.gram_weight / self.food.grams)
    }

    /// Amount of `nutrient` in this entry.
    pub fn nutrient(&self, nutrient: Nutrient) -> Option<f32> {
        Some(self.food.nutrients.value(nutrient)? * self.scale()?)
    }

    /// Every nutrient of this entry, in wire order.
    pub fn nutrients(&self) -> impl Iterator<Item = (Nutrient, Option<f32>)> + '_ {
        Nutrient::ALL
            .into_iter()
            .map(move |nutrient| (nutrient, self.nutrient(nutrient)))
    }
}

impl Body for FoodEntry {
    const TAG: u16 = tag::FOOD_ENTRY;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            master_food_entry_id: reader.read_i64()?,
            food: Food::read_body(reader)?,
            date: reader.read_date()?,
            meal_name: reader.read_string()?,
            quantity: reader.read_f32()?,
            weight_index: reader.read_i32()?,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i64(self.master_food_entry_id);
        self.food.write_body(writer)?;
        writer.write_date(&self.date)?;
        writer.write_string(&self.meal_name)?;
        writer.write_f32(self.quantity);
        writer.write_i32(self.weight_index);
        Ok(())
    }
}

/// One food inside a meal.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MealIngredient {
    pub master_ingredient_id: i32,
    pub master_food_id: i32,
    pub fraction_int: i32,
    pub quantity: f32,
    pub weight_index: i16,
}

impl MealIngredient {
    pub fn is_fraction(&self) -> bool {
        self.fraction_int > 0
    }

    pub fn set_fraction(&mut self, enabled: bool) {
        self.fraction_int = i32::from(enabled);
    }

    pub fn read(reader: &mut WireReader) -> Result<Self> {
        Ok(Self {
            master_ingredient_id: reader.read_i32()?,
            master_food_id: reader.read_i32()?,
            fraction_int: reader.read_i32()?,
            quantity: reader.read_f32()?,
            weight_index: reader.read_i16()?,
        })
    }

    pub fn write(&self, writer: &mut WireWriter) {
        writer.write_i32(self.master_ingredient_id);
        writer.write_i32(self.master_food_id);
        writer.write_i32(self.fraction_int);
        writer.write_f32(self.quantity);
        writer.write_i16(self.weight_index);
    }
}

/// The ingredient list of a meal food.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MealIngredients {
    pub master_food_id: i32,
    pub ingredients: Vec<MealIngredient>,
}

impl Body for MealIngredients {
    const TAG: u16 = tag::MEAL_INGREDIENTS;

    fn read_body(reader: &mut WireReader) -> Result<Self> {
        let master_food_id = reader.read_i32()?;
        let count = read_count_i32(reader)?;
        let ingredients = (0..count)
            .map(|_| MealIngredient::read(reader))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            master_food_id,
            ingredients,
        })
    }

    fn write_body(&self, writer: &mut WireWriter) -> Result<()> {
        writer.write_i32(self.master_food_id);
        write_count_i32(writer, self.ingredients.len())?;
        for ingredient in &self.ingredients {
            ingredient.write(writer);
        }
        Ok(())
    }
}
