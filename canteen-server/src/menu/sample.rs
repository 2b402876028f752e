//! 默认示例菜单 (首次启动且 SEED_SAMPLE_MENU=true 时写入)

use shared::models::{MenuItemCreate, NutritionalInfo};

#[allow(clippy::too_many_arguments)]
fn dish(
    name: &str,
    description: &str,
    price: f64,
    category: &str,
    image: &str,
    is_veg: bool,
    cuisine: &str,
    spice_level: u8,
    allergens: &[&str],
    nutrition: (u32, u32, u32, u32),
    ingredients: &[&str],
    preparation_time: u32,
) -> MenuItemCreate {
    let (calories, protein, carbs, fat) = nutrition;
    MenuItemCreate {
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        image: image.to_string(),
        is_veg,
        cuisine: cuisine.to_string(),
        spice_level,
        allergens: allergens.iter().map(|s| s.to_string()).collect(),
        nutritional_info: NutritionalInfo {
            calories,
            protein,
            carbs,
            fat,
        },
        is_available: true,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        preparation_time,
    }
}

pub fn sample_menu() -> Vec<MenuItemCreate> {
    vec![
        dish(
            "Chicken Biryani",
            "Aromatic basmati rice cooked with tender chicken pieces and traditional spices",
            120.0,
            "Main Course",
            "https://images.pexels.com/photos/1247755/pexels-photo-1247755.jpeg",
            false,
            "Indian",
            3,
            &["dairy"],
            (450, 25, 60, 15),
            &["Chicken", "Basmati Rice", "Spices", "Yogurt", "Onions"],
            25,
        ),
        dish(
            "Paneer Butter Masala",
            "Rich and creamy tomato-based curry with soft paneer cubes",
            100.0,
            "Main Course",
            "https://images.pexels.com/photos/2474658/pexels-photo-2474658.jpeg",
            true,
            "Indian",
            2,
            &["dairy"],
            (320, 18, 15, 22),
            &["Paneer", "Tomatoes", "Cream", "Spices", "Onions"],
            20,
        ),
        dish(
            "Masala Dosa",
            "Crispy rice crepe filled with spiced potato curry, served with chutney and sambar",
            60.0,
            "Breakfast",
            "https://images.pexels.com/photos/5560763/pexels-photo-5560763.jpeg",
            true,
            "South Indian",
            2,
            &[],
            (250, 8, 45, 6),
            &["Rice", "Lentils", "Potatoes", "Spices"],
            15,
        ),
        dish(
            "Chicken Tikka",
            "Marinated chicken pieces grilled to perfection in a tandoor oven",
            150.0,
            "Appetizer",
            "https://images.pexels.com/photos/2338407/pexels-photo-2338407.jpeg",
            false,
            "Indian",
            3,
            &["dairy"],
            (180, 28, 5, 6),
            &["Chicken", "Yogurt", "Spices", "Lemon"],
            20,
        ),
        dish(
            "Fresh Lime Soda",
            "Refreshing lime soda with mint leaves and a hint of black salt",
            30.0,
            "Beverages",
            "https://images.pexels.com/photos/1304647/pexels-photo-1304647.jpeg",
            true,
            "Indian",
            0,
            &[],
            (45, 0, 12, 0),
            &["Lime", "Soda Water", "Mint", "Black Salt"],
            5,
        ),
    ]
}
