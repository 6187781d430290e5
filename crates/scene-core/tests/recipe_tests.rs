use scene_core::{RecipeError, SceneRecipe, SceneVariant};

#[test]
fn variant_names_parse() {
    assert_eq!(
        "core-knot".parse::<SceneVariant>().unwrap(),
        SceneVariant::CoreKnot
    );
    assert_eq!(
        "globe".parse::<SceneVariant>().unwrap(),
        SceneVariant::NetworkGlobe
    );
    assert_eq!(
        "chain".parse::<SceneVariant>().unwrap(),
        SceneVariant::ChainLinks
    );
    assert_eq!(
        "ringed-planet".parse::<SceneVariant>().unwrap(),
        SceneVariant::RingedPlanet
    );
    assert!(matches!(
        "disco".parse::<SceneVariant>(),
        Err(RecipeError::UnknownVariant(_))
    ));
}

#[test]
fn every_variant_recipe_validates() {
    for v in [
        SceneVariant::CoreKnot,
        SceneVariant::NetworkGlobe,
        SceneVariant::ChainLinks,
        SceneVariant::RingedPlanet,
    ] {
        v.recipe().validate().expect("built-in recipes are valid");
    }
}

#[test]
fn empty_recipe_is_rejected() {
    let mut r = SceneRecipe::core_knot();
    r.knot = None;
    r.rings.clear();
    r.stars.clear();
    assert!(matches!(r.validate(), Err(RecipeError::Empty)));
}

#[test]
fn arc_style_bounds_are_checked() {
    let mut r = SceneRecipe::network_globe();
    r.arcs.as_mut().unwrap().max_arcs = 0;
    assert!(matches!(r.validate(), Err(RecipeError::ArcCapacity)));

    let mut r = SceneRecipe::network_globe();
    r.arcs.as_mut().unwrap().churn_interval_sec = 0.0;
    assert!(matches!(r.validate(), Err(RecipeError::ChurnInterval)));
}

#[test]
fn globe_recipe_matches_its_scene_contract() {
    let r = SceneRecipe::network_globe();
    let arcs = r.arcs.expect("globe has an arc pool");
    assert_eq!(arcs.max_arcs, 18);
    assert!((arcs.churn_interval_sec - 1.4).abs() < 1e-6);
    assert!(arcs.with_markers);
    assert!(!r.badges.is_empty());
}
