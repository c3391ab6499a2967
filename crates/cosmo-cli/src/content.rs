//! Content command handlers for the CLI.
//!
//! Each handler fetches from the CMS, normalizes through the same builders
//! the server uses, and prints plain text to stdout. A failed fetch ends
//! the command with the localized message the site would show.

use anyhow::bail;

use cosmo_cms::{to_detail, to_search_entry, to_summary, to_work, CmsClient, CmsError};
use cosmo_core::{
    group_by_first_letter, CatalogGroup, ImageResolver, Rendition, RichTextBlock, SearchIndex,
    ServiceDetail, ServiceSummary, Work, WorkDisplay,
};

const SERVICES_SUBJECT: &str = "услуг";

fn fail(error: &CmsError, subject: &str) -> anyhow::Error {
    tracing::debug!(error = ?error, "CMS fetch failed");
    anyhow::anyhow!(error.user_message(subject))
}

fn format_summary(service: &ServiceSummary) -> String {
    if service.description.is_empty() {
        format!("{}  [{}]", service.title, service.slug)
    } else {
        format!("{}  [{}]\n    {}", service.title, service.slug, service.description)
    }
}

fn format_catalog(groups: &[CatalogGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{}\n", group.letter));
        for service in &group.services {
            out.push_str(&format!("  {}  [{}]\n", service.title, service.slug));
        }
    }
    out
}

fn push_section(out: &mut String, heading: &str, blocks: Option<&Vec<RichTextBlock>>) {
    let Some(blocks) = blocks else { return };
    let text: Vec<String> = blocks
        .iter()
        .filter(|block| !block.is_blank())
        .map(RichTextBlock::plain_text)
        .collect();
    if text.is_empty() {
        return;
    }
    out.push_str(&format!("\n{heading}:\n"));
    for line in text {
        out.push_str(&format!("  {line}\n"));
    }
}

fn format_detail(service: &ServiceDetail, main_image: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  [{}]\n", service.title, service.slug));
    if let Some(url) = main_image {
        out.push_str(&format!("Изображение: {url}\n"));
    }
    let description = service.description.plain_text();
    if !description.trim().is_empty() {
        out.push_str(&format!("\n{description}\n"));
    }

    push_section(&mut out, "Показания", service.indications.as_ref());
    push_section(&mut out, "Эффект", service.effect_description.as_ref());
    push_section(&mut out, "Противопоказания", service.contraindications.as_ref());

    if let Some(details) = &service.procedure_details {
        let entries = details.entries();
        if !entries.is_empty() {
            out.push_str("\nО процедуре:\n");
            for (label, value) in entries {
                out.push_str(&format!("  {label}: {value}\n"));
            }
        }
    }

    if let Some(prices) = service.price_list.as_ref().filter(|p| !p.is_empty()) {
        out.push_str("\nПрайс:\n");
        for item in prices {
            let name = item.name.as_deref().unwrap_or("—");
            let extra: Vec<&str> = [item.unit.as_deref(), item.duration.as_deref()]
                .into_iter()
                .flatten()
                .filter(|v| !v.is_empty())
                .collect();
            if extra.is_empty() {
                out.push_str(&format!("  {name}\n"));
            } else {
                out.push_str(&format!("  {name} ({})\n", extra.join(", ")));
            }
        }
    }

    if let Some(note) = &service.note {
        out.push_str(&format!("\nПримечание: {note}\n"));
    }
    out
}

fn describe_display(display: &WorkDisplay) -> String {
    match display {
        WorkDisplay::BeforeAfterImages { before, after } => {
            format!("до/после (фото): {before} -> {after}")
        }
        WorkDisplay::BeforeAfterVideos { before, after, .. } => {
            format!("до/после (видео): {before} -> {after}")
        }
        WorkDisplay::Gallery { items } => format!("галерея: {} элемент(ов)", items.len()),
        WorkDisplay::SingleVideo { url, .. } => format!("видео: {url}"),
        WorkDisplay::SingleImage { url } => format!("фото: {url}"),
        WorkDisplay::Placeholder { url } => format!("заглушка: {url}"),
    }
}

fn format_work(work: &Work, display: &WorkDisplay) -> String {
    format!("#{} {}\n    {}", work.id, work.title, describe_display(display))
}

pub(crate) async fn run_services(cms: &CmsClient, full: bool) -> anyhow::Result<()> {
    let raw = cms
        .list_services()
        .await
        .map_err(|e| fail(&e, SERVICES_SUBJECT))?;
    let build = if full { to_search_entry } else { to_summary };
    for record in &raw {
        println!("{}", format_summary(&build(record)));
    }
    println!("\nВсего: {}", raw.len());
    Ok(())
}

pub(crate) async fn run_service(
    cms: &CmsClient,
    resolver: &ImageResolver,
    slug: &str,
) -> anyhow::Result<()> {
    let Some(raw) = cms
        .service_by_slug(slug)
        .await
        .map_err(|e| fail(&e, "услуги"))?
    else {
        bail!("Услуга «{slug}» не найдена");
    };
    let service = to_detail(&raw);
    let main_image = resolver.resolve(Some(service.image.as_slice()), Some(Rendition::Large));
    print!("{}", format_detail(&service, main_image.as_deref()));
    Ok(())
}

pub(crate) async fn run_catalog(cms: &CmsClient) -> anyhow::Result<()> {
    let raw = cms
        .list_services()
        .await
        .map_err(|e| fail(&e, SERVICES_SUBJECT))?;
    let services: Vec<ServiceSummary> = raw.iter().map(to_summary).collect();
    print!("{}", format_catalog(&group_by_first_letter(&services)));
    Ok(())
}

pub(crate) async fn run_search(cms: &CmsClient, query: &str) -> anyhow::Result<()> {
    let raw = cms
        .list_services()
        .await
        .map_err(|e| fail(&e, SERVICES_SUBJECT))?;
    let mut index = SearchIndex::new();
    index.set_all(raw.iter().map(to_search_entry).collect());
    index.set_query(query);

    let results = index.results();
    if results.is_empty() {
        println!("Ничего не найдено");
        return Ok(());
    }
    for service in results {
        println!("{}", format_summary(service));
    }
    Ok(())
}

pub(crate) async fn run_works(cms: &CmsClient, resolver: &ImageResolver) -> anyhow::Result<()> {
    let raw = match cms.list_works().await {
        Ok(raw) => raw,
        Err(e) if e.status().is_some() => bail!("Не удалось загрузить работы"),
        Err(e) => {
            tracing::debug!(error = ?e, "CMS fetch failed");
            bail!("Произошла ошибка при загрузке работ")
        }
    };
    for record in &raw {
        let work = to_work(record);
        let display = WorkDisplay::for_work(&work, resolver);
        println!("{}", format_work(&work, &display));
    }
    Ok(())
}

pub(crate) async fn run_slugs(cms: &CmsClient) -> anyhow::Result<()> {
    let slugs = cms
        .list_service_slugs()
        .await
        .map_err(|e| fail(&e, SERVICES_SUBJECT))?;
    for slug in slugs {
        println!("{slug}");
    }
    Ok(())
}
