use crate::core::{Group, PointRef};

/// Produces the structural text announced for each focus target.
///
/// Hosts replace the default to plug in localized templates.
pub trait AnnouncementFormatter {
    fn chart_label(&self, configured: Option<&str>) -> String {
        configured.unwrap_or("Chart").to_owned()
    }

    fn group_label(&self, group: &Group) -> String;

    fn point_label(&self, point: &PointRef, group: &Group) -> String;
}

/// Plain `name value` listing in group order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAnnouncementFormatter;

impl AnnouncementFormatter for DefaultAnnouncementFormatter {
    fn group_label(&self, group: &Group) -> String {
        let values = group
            .points
            .iter()
            .map(|point| format!("{} {}", point.series_name, point.y))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}, {values}", group.x)
    }

    fn point_label(&self, point: &PointRef, group: &Group) -> String {
        let position = group
            .index_of(&point.key)
            .map_or(String::new(), |index| {
                format!(", {} of {}", index + 1, group.points.len())
            });
        format!("{} {}, {}{position}", point.series_name, point.x, point.y)
    }
}
