//! Behaviour tests for the Job Card redirect controller.
//!
//! The controller is driven through the in-memory identity store and a
//! recording navigator, so each scenario observes exactly which targets a
//! browser would have been sent to.

use std::cell::RefCell;
use std::sync::Arc;

use pr_portal::domain::ports::{InMemoryIdentityStore, RecordingNavigator};
use pr_portal::domain::{AuthenticatedUser, JobCardOrigin, RedirectController, RedirectView};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct RedirectWorld {
    store: Arc<InMemoryIdentityStore>,
    navigator: Arc<RecordingNavigator>,
    controller: RefCell<Option<RedirectController<InMemoryIdentityStore, RecordingNavigator>>>,
    last_view: RefCell<Option<RedirectView>>,
}

impl RedirectWorld {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryIdentityStore::default()),
            navigator: Arc::new(RecordingNavigator::default()),
            controller: RefCell::new(None),
            last_view: RefCell::new(None),
        }
    }

    fn observe(&self) {
        let mut controller = self.controller.borrow_mut();
        let controller = controller.as_mut().expect("controller should be created");
        let view = controller.on_identity_change();
        *self.last_view.borrow_mut() = Some(view);
    }

    fn view(&self) -> RedirectView {
        self.last_view
            .borrow()
            .clone()
            .expect("controller should have been observed")
    }
}

#[fixture]
fn world() -> RedirectWorld {
    RedirectWorld::new()
}

#[given("a redirect controller waiting for sign-in")]
fn a_redirect_controller_waiting_for_sign_in(world: &RedirectWorld) {
    let controller = RedirectController::new(
        Arc::clone(&world.store),
        Arc::clone(&world.navigator),
        JobCardOrigin::default(),
    );
    *world.controller.borrow_mut() = Some(controller);
}

#[when("the identity store reports user \"{uid}\" with email \"{email}\" named \"{first}\" \"{last}\"")]
fn the_identity_store_reports_a_named_user(
    world: &RedirectWorld,
    uid: String,
    email: String,
    first: String,
    last: String,
) {
    world
        .store
        .set_user(Some(AuthenticatedUser::new(uid, email).with_names(first, last)));
}

#[when("the identity store reports user \"{uid}\" with email \"{email}\" and no names")]
fn the_identity_store_reports_an_unnamed_user(world: &RedirectWorld, uid: String, email: String) {
    world.store.set_user(Some(AuthenticatedUser::new(uid, email)));
}

#[when("the controller observes the identity store {count} times")]
fn the_controller_observes_the_identity_store(world: &RedirectWorld, count: usize) {
    for _ in 0..count {
        world.observe();
    }
}

#[then("the controller navigated to \"{target}\"")]
fn the_controller_navigated_to(world: &RedirectWorld, target: String) {
    assert_eq!(world.navigator.targets().first(), Some(&target));
    assert_eq!(world.view(), RedirectView::Redirecting { target });
}

#[then("the navigation target ends with \"{suffix}\"")]
fn the_navigation_target_ends_with(world: &RedirectWorld, suffix: String) {
    let targets = world.navigator.targets();
    let target = targets.first().expect("a navigation should be issued");
    assert!(
        target.ends_with(&suffix),
        "expected '{target}' to end with '{suffix}'"
    );
}

#[then("exactly {count} navigation was issued")]
fn exactly_count_navigation_was_issued(world: &RedirectWorld, count: usize) {
    assert_eq!(world.navigator.targets().len(), count);
}

#[then("the redirect view is redirecting")]
fn the_redirect_view_is_redirecting(world: &RedirectWorld) {
    assert!(matches!(world.view(), RedirectView::Redirecting { .. }));
}

#[then("the redirect view is loading")]
fn the_redirect_view_is_loading(world: &RedirectWorld) {
    assert_eq!(world.view(), RedirectView::Loading);
}

#[scenario(
    path = "tests/features/redirect_controller.feature",
    name = "Signed-in user is handed off with identity parameters"
)]
fn signed_in_user_is_handed_off_with_identity_parameters(world: RedirectWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/redirect_controller.feature",
    name = "Email stands in for a missing display name"
)]
fn email_stands_in_for_a_missing_display_name(world: RedirectWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/redirect_controller.feature",
    name = "Repeated identity notifications navigate once"
)]
fn repeated_identity_notifications_navigate_once(world: RedirectWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/redirect_controller.feature",
    name = "Nobody signed in keeps the loading view"
)]
fn nobody_signed_in_keeps_the_loading_view(world: RedirectWorld) {
    drop(world);
}
