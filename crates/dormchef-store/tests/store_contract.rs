// SPDX-License-Identifier: Apache-2.0

use dormchef_model::{DayIndex, MealType, RecipeId, Servings, UserId, WeekOf};
use dormchef_store::{
    add_meal_plan_item, configure_connection, create_follow, create_recipe, create_user,
    delete_follow, delete_meal_plan_item, delete_recipe, find_meal_plan, find_user_by_email,
    follow_exists, following_ids, get_or_create_meal_plan, get_recipe, list_recipes,
    meal_plan_item_owner, migrate, recent_plan_items_by_users, recent_recipes_by_authors,
    recipe_author, seed_demo_data, toggle_like, Database, NewIngredient, NewMealPlanItem,
    NewRecipe, NewUser, RecipeFilter, StoreError, DEMO_USERS,
};
use pretty_assertions::assert_eq;
use rusqlite::Connection;

fn fresh() -> Connection {
    let mut conn = Connection::open_in_memory().expect("open");
    configure_connection(&conn).expect("configure");
    migrate(&mut conn).expect("migrate");
    conn
}

fn user(conn: &Connection, name: &str) -> UserId {
    create_user(
        conn,
        &NewUser {
            name: name.to_string(),
            email: format!("{}@example.test", name.to_lowercase()),
            password_hash: "hash".to_string(),
            image: None,
        },
    )
    .expect("user")
    .id
}

fn new_recipe(title: &str, tags: &[&str]) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        hero_image: None,
        cook_time_min: 10,
        servings: 2,
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        steps: vec!["Heat".to_string(), "Eat".to_string()],
        ingredients: vec![
            NewIngredient {
                name: "Instant rice".to_string(),
                qty: 2.0,
                unit: "cup".to_string(),
                approx_price: 0.6,
            },
            NewIngredient {
                name: "Egg".to_string(),
                qty: 1.0,
                unit: "piece".to_string(),
                approx_price: 0.25,
            },
        ],
    }
}

fn week() -> WeekOf {
    WeekOf::parse("2024-05-13").expect("week")
}

#[test]
fn duplicate_email_is_a_conflict() {
    let conn = fresh();
    user(&conn, "Ana");
    let err = create_user(
        &conn,
        &NewUser {
            name: "Other".to_string(),
            email: "ana@example.test".to_string(),
            password_hash: "x".to_string(),
            image: None,
        },
    )
    .expect_err("duplicate");
    assert!(matches!(err, StoreError::Conflict(_)));
    let creds = find_user_by_email(&conn, "ana@example.test")
        .expect("lookup")
        .expect("present");
    assert_eq!(creds.password_hash, "hash");
    assert_eq!(creds.user.name.as_deref(), Some("Ana"));
}

#[test]
fn recipe_round_trips_with_cost_tags_and_likes() {
    let mut conn = fresh();
    let author = user(&conn, "Ana");
    let fan = user(&conn, "Ben");
    let created = create_recipe(&mut conn, &author, &new_recipe("Fried Rice", &["quick"]))
        .expect("create");
    assert_eq!(created.est_cost_total, 0.85);
    assert_eq!(created.tags, vec!["quick".to_string()]);
    assert_eq!(created.ingredients.len(), 2);
    assert_eq!(created.ingredients[0].name, "Instant rice");
    assert_eq!(created.author.name.as_deref(), Some("Ana"));
    assert_eq!(created.counts.likes, 0);

    assert!(toggle_like(&mut conn, &fan, &created.id).expect("like"));
    let seen = get_recipe(&conn, &created.id, Some(&fan))
        .expect("get")
        .expect("present");
    assert_eq!(seen.counts.likes, 1);
    assert_eq!(seen.is_liked, Some(true));
    let anonymous = get_recipe(&conn, &created.id, None)
        .expect("get")
        .expect("present");
    assert_eq!(anonymous.is_liked, None);

    assert!(!toggle_like(&mut conn, &fan, &created.id).expect("unlike"));
    let seen = get_recipe(&conn, &created.id, Some(&fan))
        .expect("get")
        .expect("present");
    assert_eq!(seen.counts.likes, 0);
    assert_eq!(seen.is_liked, Some(false));
}

#[test]
fn like_on_missing_recipe_is_not_found() {
    let mut conn = fresh();
    let fan = user(&conn, "Ben");
    let missing = RecipeId::parse("nope").expect("id");
    assert!(matches!(
        toggle_like(&mut conn, &fan, &missing),
        Err(StoreError::NotFound("recipe"))
    ));
}

#[test]
fn list_filters_by_search_and_tag() {
    let mut conn = fresh();
    let author = user(&conn, "Ana");
    create_recipe(&mut conn, &author, &new_recipe("Microwave Mac", &["microwave-only"]))
        .expect("a");
    create_recipe(&mut conn, &author, &new_recipe("Protein Oats", &["high-protein"]))
        .expect("b");
    create_recipe(&mut conn, &author, &new_recipe("100% Juice", &["drink"])).expect("c");

    let all = list_recipes(&conn, &RecipeFilter::default()).expect("all");
    let titles: Vec<&str> = all.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["100% Juice", "Protein Oats", "Microwave Mac"]);

    let search = RecipeFilter {
        search: Some("MAC".to_string()),
        tag: None,
    };
    assert_eq!(list_recipes(&conn, &search).expect("search").len(), 1);

    let percent = RecipeFilter {
        search: Some("%".to_string()),
        tag: None,
    };
    let hits = list_recipes(&conn, &percent).expect("percent");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Juice");

    let tag = RecipeFilter {
        search: None,
        tag: Some("protein".to_string()),
    };
    let hits = list_recipes(&conn, &tag).expect("tag");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Protein Oats");
}

#[test]
fn title_search_folds_accented_letters() {
    let mut conn = fresh();
    let author = user(&conn, "Ana");
    create_recipe(&mut conn, &author, &new_recipe("Crème Brûlée", &["dessert"])).expect("a");
    create_recipe(&mut conn, &author, &new_recipe("Creme Soda", &["drink"])).expect("b");

    for needle in ["crème", "CRÈME", "BRÛLÉE", "brûlée"] {
        let filter = RecipeFilter {
            search: Some(needle.to_string()),
            tag: None,
        };
        let hits = list_recipes(&conn, &filter).expect("search");
        let titles: Vec<&str> = hits.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Crème Brûlée"], "search {needle}");
    }

    let both = RecipeFilter {
        search: Some("CRÈME".to_string()),
        tag: Some("drink".to_string()),
    };
    assert!(list_recipes(&conn, &both).expect("both").is_empty());
}

#[test]
fn deleting_a_recipe_cascades() {
    let mut conn = fresh();
    let author = user(&conn, "Ana");
    let recipe = create_recipe(&mut conn, &author, &new_recipe("Soup", &[])).expect("create");
    toggle_like(&mut conn, &author, &recipe.id).expect("like");
    add_meal_plan_item(
        &mut conn,
        &author,
        &NewMealPlanItem {
            recipe_id: recipe.id.clone(),
            day_index: DayIndex::new(2).expect("day"),
            meal_type: MealType::Dinner,
            servings: Servings::ONE,
            week_of: week(),
        },
    )
    .expect("plan");

    assert_eq!(recipe_author(&conn, &recipe.id).expect("author"), Some(author.clone()));
    assert!(delete_recipe(&conn, &recipe.id).expect("delete"));
    assert!(!delete_recipe(&conn, &recipe.id).expect("second delete"));
    let plan = find_meal_plan(&conn, &author, week())
        .expect("plan")
        .expect("exists");
    assert!(plan.items.is_empty());
    let ingredients: i64 = conn
        .query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))
        .expect("count");
    assert_eq!(ingredients, 0);
}

#[test]
fn follows_are_unique_and_removable() {
    let conn = fresh();
    let ana = user(&conn, "Ana");
    let ben = user(&conn, "Ben");

    let follow = create_follow(&conn, &ana, &ben).expect("follow");
    assert_eq!(follow.to.name.as_deref(), Some("Ben"));
    assert!(follow_exists(&conn, &ana, &ben).expect("exists"));
    assert!(!follow_exists(&conn, &ben, &ana).expect("reverse"));
    assert!(matches!(
        create_follow(&conn, &ana, &ben),
        Err(StoreError::Conflict(_))
    ));
    let ghost = UserId::parse("ghost").expect("id");
    assert!(matches!(
        create_follow(&conn, &ana, &ghost),
        Err(StoreError::NotFound("user"))
    ));

    assert_eq!(following_ids(&conn, &ana).expect("ids"), vec![ben.clone()]);
    assert!(delete_follow(&conn, &ana, &ben).expect("unfollow"));
    assert!(!delete_follow(&conn, &ana, &ben).expect("again"));
}

#[test]
fn meal_plan_is_created_once_per_week() {
    let mut conn = fresh();
    let ana = user(&conn, "Ana");
    assert!(find_meal_plan(&conn, &ana, week()).expect("find").is_none());

    let first = get_or_create_meal_plan(&conn, &ana, week()).expect("create");
    let second = get_or_create_meal_plan(&conn, &ana, week()).expect("again");
    assert_eq!(first.id, second.id);
    assert_eq!(first.week_of.as_key(), "2024-05-13");

    let recipe = create_recipe(&mut conn, &ana, &new_recipe("Oats", &[])).expect("recipe");
    let item = add_meal_plan_item(
        &mut conn,
        &ana,
        &NewMealPlanItem {
            recipe_id: recipe.id.clone(),
            day_index: DayIndex::new(0).expect("day"),
            meal_type: MealType::Breakfast,
            servings: Servings::new(3).expect("servings"),
            week_of: week(),
        },
    )
    .expect("item");
    assert_eq!(item.meal_plan_id, first.id);
    assert_eq!(item.recipe.title, "Oats");
    assert_eq!(item.servings.get(), 3);

    let plan = find_meal_plan(&conn, &ana, week())
        .expect("find")
        .expect("exists");
    assert_eq!(plan.items.len(), 1);
    assert_eq!(plan.items[0].recipe.ingredients.len(), 2);

    assert_eq!(meal_plan_item_owner(&conn, &item.id).expect("owner"), Some(ana));
    assert!(delete_meal_plan_item(&conn, &item.id).expect("delete"));
    assert_eq!(meal_plan_item_owner(&conn, &item.id).expect("gone"), None);
}

#[test]
fn plan_items_come_back_in_insertion_order() {
    let mut conn = fresh();
    let ana = user(&conn, "Ana");
    let recipe = create_recipe(&mut conn, &ana, &new_recipe("Oats", &[])).expect("recipe");
    for day in [5, 1, 3] {
        add_meal_plan_item(
            &mut conn,
            &ana,
            &NewMealPlanItem {
                recipe_id: recipe.id.clone(),
                day_index: DayIndex::new(day).expect("day"),
                meal_type: MealType::Lunch,
                servings: Servings::ONE,
                week_of: week(),
            },
        )
        .expect("item");
    }
    let plan = find_meal_plan(&conn, &ana, week())
        .expect("find")
        .expect("exists");
    let days: Vec<u8> = plan.items.iter().map(|i| i.day_index.get()).collect();
    assert_eq!(days, vec![5, 1, 3]);
}

#[test]
fn plan_item_for_unknown_recipe_is_not_found_and_creates_nothing() {
    let mut conn = fresh();
    let ana = user(&conn, "Ana");
    let err = add_meal_plan_item(
        &mut conn,
        &ana,
        &NewMealPlanItem {
            recipe_id: RecipeId::parse("missing").expect("id"),
            day_index: DayIndex::new(0).expect("day"),
            meal_type: MealType::Lunch,
            servings: Servings::ONE,
            week_of: week(),
        },
    )
    .expect_err("missing recipe");
    assert!(matches!(err, StoreError::NotFound("recipe")));
    assert!(find_meal_plan(&conn, &ana, week()).expect("find").is_none());
}

#[test]
fn corrupt_tags_surface_as_corrupt() {
    let mut conn = fresh();
    let ana = user(&conn, "Ana");
    let recipe = create_recipe(&mut conn, &ana, &new_recipe("Bad", &[])).expect("recipe");
    conn.execute(
        "UPDATE recipes SET tags = 'not json' WHERE id = ?1",
        [recipe.id.as_str()],
    )
    .expect("corrupt");
    assert!(matches!(
        get_recipe(&conn, &recipe.id, None),
        Err(StoreError::Corrupt(_))
    ));
}

#[test]
fn seed_builds_the_demo_world_once() {
    let mut conn = fresh();
    let report = seed_demo_data(&mut conn, "hash", week()).expect("seed");
    assert_eq!(report.users, 3);
    assert_eq!(report.follows, 2);
    assert_eq!(report.recipes, 10);
    assert_eq!(report.plan_items, 6);
    assert_eq!(report.likes, 6);
    assert!(!report.skipped);

    let again = seed_demo_data(&mut conn, "hash", week()).expect("reseed");
    assert!(again.skipped);

    let dave = find_user_by_email(&conn, DEMO_USERS[0].1)
        .expect("lookup")
        .expect("dave")
        .user;
    let followed = following_ids(&conn, &dave.id).expect("following");
    assert_eq!(followed.len(), 2);

    let plan = find_meal_plan(&conn, &dave.id, week())
        .expect("plan")
        .expect("exists");
    assert_eq!(plan.items.len(), 6);
    assert_eq!(plan.items[0].day_index.get(), 0);

    let recipes = recent_recipes_by_authors(&conn, &followed, 20).expect("recent");
    // Mike and Sam wrote recipes 1,2,4,5,7,8 of the ten.
    assert_eq!(recipes.len(), 6);
    assert!(recipes
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));
    assert!(recent_plan_items_by_users(&conn, &followed, 20)
        .expect("activity")
        .is_empty());
    let own = recent_plan_items_by_users(&conn, &[dave.id.clone()], 4).expect("own");
    assert_eq!(own.len(), 4);
    assert_eq!(own[0].owner.id, dave.id);
}

#[test]
fn feed_queries_short_circuit_on_empty_input() {
    let conn = fresh();
    assert!(recent_recipes_by_authors(&conn, &[], 20).expect("recipes").is_empty());
    assert!(recent_plan_items_by_users(&conn, &[], 20).expect("items").is_empty());
}

#[tokio::test]
async fn database_handle_runs_calls_on_the_blocking_pool() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("dormchef.sqlite");
    let db = Database::open(&path).expect("open");
    db.ping().await.expect("ping");
    let id = db
        .call(|conn| {
            create_user(
                conn,
                &NewUser {
                    name: "Ana".to_string(),
                    email: "ana@example.test".to_string(),
                    password_hash: "hash".to_string(),
                    image: None,
                },
            )
        })
        .await
        .expect("create")
        .id;
    drop(db);

    let reopened = Database::open(&path).expect("reopen");
    let found = reopened
        .call(move |conn| dormchef_store::find_user(conn, &id))
        .await
        .expect("find");
    assert!(found.is_some());
    assert_eq!(reopened.path(), Some(path.as_path()));
}
