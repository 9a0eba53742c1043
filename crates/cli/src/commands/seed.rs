//! Catalog seeding command.
//!
//! Loads the café menu into an empty database: categories with their
//! option policies, drink sizes, extras, and the products themselves.
//! Seeding is idempotent per slug; rerunning skips rows that exist.

use super::{CommandError, connect};

/// The café menu.
///
/// Explicit ids keep the FK references readable; the sequences are bumped
/// at the end so later inserts do not collide.
const SEED_SQL: &str = r"
INSERT INTO categories (id, name, stock_managed, allows_sugar, allows_cinnamon, allows_milk, allows_syrup) VALUES
    (1, 'Hearty food', TRUE,  FALSE, FALSE, FALSE, FALSE),
    (2, 'Drinks',      FALSE, TRUE,  FALSE, FALSE, TRUE),
    (3, 'Coffee',      FALSE, TRUE,  TRUE,  TRUE,  TRUE),
    (4, 'Desserts',    TRUE,  FALSE, FALSE, FALSE, FALSE)
ON CONFLICT (id) DO NOTHING;

INSERT INTO sizes (id, name, volume) VALUES
    (1, 'Small',  '200ml'),
    (2, 'Medium', '300ml'),
    (3, 'Large',  '400ml')
ON CONFLICT (id) DO NOTHING;

INSERT INTO extras (id, name, kind, price) VALUES
    (1, 'Oat milk',       'milk',  50.00),
    (2, 'Almond milk',    'milk',  60.00),
    (3, 'Coconut milk',   'milk',  60.00),
    (4, 'Caramel syrup',  'syrup', 40.00),
    (5, 'Vanilla syrup',  'syrup', 40.00),
    (6, 'Hazelnut syrup', 'syrup', 40.00),
    (7, 'Salted caramel syrup', 'syrup', 45.00)
ON CONFLICT (id) DO NOTHING;

INSERT INTO nutrition_facts (id, kilocalories, proteins, fats, carbohydrates) VALUES
    (1, 180, 9,  9,  15),
    (2, 330, 6,  18, 35),
    (3, 2,   0,  0,  0)
ON CONFLICT (id) DO NOTHING;

INSERT INTO products
    (name, slug, price, category_id, size_id, nutrition_facts_id,
     stock_count, allows_extras, allows_condensed_milk, variable_price)
VALUES
    -- Coffee: one entry per size, collapsed into one menu entry per name
    ('Latte', 'latte-small',  220.00, 3, 1, 1, 0, TRUE, FALSE, FALSE),
    ('Latte', 'latte-medium', 250.00, 3, 2, 1, 0, TRUE, FALSE, FALSE),
    ('Latte', 'latte-large',  280.00, 3, 3, 1, 0, TRUE, FALSE, FALSE),
    ('Cappuccino', 'cappuccino-small',  210.00, 3, 1, 1, 0, TRUE, FALSE, FALSE),
    ('Cappuccino', 'cappuccino-medium', 240.00, 3, 2, 1, 0, TRUE, FALSE, FALSE),
    ('Cappuccino', 'cappuccino-large',  270.00, 3, 3, 1, 0, TRUE, FALSE, FALSE),
    ('Flat white', 'flat-white', 260.00, 3, 2, 1, 0, TRUE, FALSE, FALSE),
    -- Black coffees never take milk or syrup
    ('Americano', 'americano', 150.00, 3, 2, 3, 0, FALSE, FALSE, FALSE),
    ('Espresso',  'espresso',  120.00, 3, 1, 3, 0, FALSE, FALSE, FALSE),
    -- Drinks
    ('Black tea',   'black-tea',   120.00, 2, 2, NULL, 0, TRUE, FALSE, FALSE),
    ('Green tea',   'green-tea',   120.00, 2, 2, NULL, 0, TRUE, FALSE, FALSE),
    ('Hot chocolate', 'hot-chocolate', 200.00, 2, 2, NULL, 0, TRUE, FALSE, FALSE),
    -- Hearty food, stock managed
    ('Ham and cheese croissant', 'ham-and-cheese-croissant', 280.00, 1, NULL, 2, 12, TRUE, FALSE, FALSE),
    ('Chicken soup', 'chicken-soup', 320.00, 1, NULL, NULL, 8, TRUE, FALSE, FALSE),
    ('Quiche', 'quiche', 300.00, 1, NULL, NULL, 6, TRUE, FALSE, FALSE),
    -- Price depends on the day's batch
    ('Chips', 'chips', 90.00, 1, NULL, NULL, 20, TRUE, FALSE, TRUE),
    -- Desserts, stock managed
    ('Cheesecake', 'cheesecake', 320.00, 4, NULL, 2, 10, TRUE, FALSE, FALSE),
    ('Croissant', 'croissant', 180.00, 4, NULL, 2, 15, TRUE, FALSE, FALSE),
    -- Traditionally served with condensed milk; priced per weight
    ('Cheese pancakes', 'cheese-pancakes', 180.00, 4, NULL, 2, 9, TRUE, TRUE, TRUE)
ON CONFLICT (slug) DO NOTHING;

SELECT setval(pg_get_serial_sequence('categories', 'id'), (SELECT MAX(id) FROM categories));
SELECT setval(pg_get_serial_sequence('sizes', 'id'), (SELECT MAX(id) FROM sizes));
SELECT setval(pg_get_serial_sequence('extras', 'id'), (SELECT MAX(id) FROM extras));
SELECT setval(pg_get_serial_sequence('nutrition_facts', 'id'), (SELECT MAX(id) FROM nutrition_facts));
";

/// Seed the catalog.
///
/// # Errors
///
/// Returns a `CommandError` when the connection or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Seeding catalog...");
    sqlx::raw_sql(SEED_SQL).execute(&pool).await?;

    tracing::info!("Catalog seeded");
    Ok(())
}
