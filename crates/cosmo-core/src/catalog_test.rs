use super::*;
use crate::services::ServiceId;

fn service(id: i64, title: &str) -> ServiceSummary {
    ServiceSummary {
        id: ServiceId::Int(id),
        title: title.to_owned(),
        description: String::new(),
        slug: format!("service-{id}"),
        image: Vec::new(),
    }
}

fn letters(groups: &[CatalogGroup]) -> Vec<&str> {
    groups.iter().map(|g| g.letter.as_str()).collect()
}

fn titles(group: &CatalogGroup) -> Vec<&str> {
    group.services.iter().map(|s| s.title.as_str()).collect()
}

#[test]
fn groups_mixed_scripts_with_other_bucket_last() {
    let services = vec![
        service(1, "Ёлка"),
        service(2, "Apple"),
        service(3, "1 услуга"),
        service(4, UNTITLED),
    ];
    let groups = group_by_first_letter(&services);

    assert_eq!(letters(&groups), vec!["A", "Ё", "#"]);
    assert_eq!(titles(&groups[0]), vec!["Apple"]);
    assert_eq!(titles(&groups[1]), vec!["Ёлка"]);
    assert_eq!(titles(&groups[2]), vec!["1 услуга", UNTITLED]);
}

#[test]
fn lowercase_titles_share_the_uppercase_bucket() {
    let services = vec![service(1, "массаж"), service(2, "Мезотерапия")];
    let groups = group_by_first_letter(&services);
    assert_eq!(letters(&groups), vec!["М"]);
    assert_eq!(titles(&groups[0]), vec!["массаж", "Мезотерапия"]);
}

#[test]
fn cyrillic_buckets_follow_russian_alphabet() {
    let services = vec![
        service(1, "Жасмин"),
        service(2, "Ёлка"),
        service(3, "Естественный лифтинг"),
        service(4, "Биоревитализация"),
        service(5, "Яблочный пилинг"),
    ];
    let groups = group_by_first_letter(&services);
    assert_eq!(letters(&groups), vec!["Б", "Е", "Ё", "Ж", "Я"]);
}

#[test]
fn latin_buckets_sort_before_cyrillic() {
    let services = vec![service(1, "Чистка"), service(2, "SMAS"), service(3, "Botox")];
    let groups = group_by_first_letter(&services);
    assert_eq!(letters(&groups), vec!["B", "S", "Ч"]);
}

#[test]
fn empty_and_symbol_titles_go_to_other_bucket() {
    let services = vec![service(1, ""), service(2, "«Сияние»"), service(3, " Пробел")];
    let groups = group_by_first_letter(&services);
    assert_eq!(letters(&groups), vec!["#"]);
    assert_eq!(groups[0].services.len(), 3);
}

#[test]
fn grouping_is_deterministic() {
    let services = vec![
        service(1, "Пилинг"),
        service(2, "Array"),
        service(3, "Пластика"),
        service(4, "42"),
    ];
    assert_eq!(
        group_by_first_letter(&services),
        group_by_first_letter(&services)
    );
}

#[test]
fn empty_input_yields_no_groups() {
    assert!(group_by_first_letter(&[]).is_empty());
}
