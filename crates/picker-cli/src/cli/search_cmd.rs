use super::*;

pub(super) async fn handle_search(config: &PickerConfig, args: SearchArgs) -> anyhow::Result<()> {
    let known = known_repositories(config, args.repos.as_deref())?;
    let provider = build_provider(config)?;
    let mut picker = RepoPicker::new(known, SharedSelection::new());

    if let Some(ticket) = picker.begin_search(&args.query) {
        let done = fetch(&provider, ticket).await;
        picker.complete_search(done);
    }

    let install = install_link(config);
    for line in render_entries(&picker.visible(&args.query), install.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

pub(super) fn handle_served_app(args: ServedAppArgs) -> anyhow::Result<()> {
    println!("{}", ServedAppStatus::from_active_host(args.host.as_deref()));
    Ok(())
}
