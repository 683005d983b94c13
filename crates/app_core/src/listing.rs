//! Generic item list rendering model
//!
//! Ingredient results, category tiles, area buttons and overlay meal lists
//! are all the same shape: items placed on a grid, each with a label, an
//! optional thumbnail and an optional detail trigger. `ListView` holds that
//! shape; the UI only draws it.

use crate::grid::{plan, GridCell, GridPlacement};
use crate::model::{AreaRecord, CategoryRecord, MealSummary};
use crate::thumbnail::{Thumbnail, ThumbnailLoader, ThumbnailSize};
use crate::transport::HttpTransport;
use crate::view_state::{Action, Owner};

/// Identifies one rendered view; thumbnail completions are routed by it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// What activating a list entry does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    OpenMeal(String),
    ViewCategory(String),
    SelectArea(String),
}

impl Trigger {
    /// Turn into a controller action issued by `origin`
    pub fn into_action(self, origin: Owner) -> Action {
        match self {
            Trigger::OpenMeal(id) => Action::OpenMeal { id, origin },
            Trigger::ViewCategory(name) => Action::ViewCategoryMeals(name),
            Trigger::SelectArea(name) => Action::SelectArea(name),
        }
    }
}

/// Accessors a list entry must provide
pub trait ListItem {
    fn label(&self) -> &str;
    fn thumbnail_url(&self) -> Option<&str>;
    fn trigger(&self) -> Option<Trigger>;
}

impl ListItem for MealSummary {
    fn label(&self) -> &str {
        self.name()
    }

    fn thumbnail_url(&self) -> Option<&str> {
        Some(self.thumbnail_url()).filter(|url| !url.is_empty())
    }

    fn trigger(&self) -> Option<Trigger> {
        Some(Trigger::OpenMeal(self.id().to_string()))
    }
}

impl ListItem for CategoryRecord {
    fn label(&self) -> &str {
        self.name()
    }

    fn thumbnail_url(&self) -> Option<&str> {
        Some(self.thumbnail_url()).filter(|url| !url.is_empty())
    }

    fn trigger(&self) -> Option<Trigger> {
        Some(Trigger::ViewCategory(self.name().to_string()))
    }
}

impl ListItem for AreaRecord {
    fn label(&self) -> &str {
        self.name()
    }

    fn thumbnail_url(&self) -> Option<&str> {
        None
    }

    fn trigger(&self) -> Option<Trigger> {
        Some(Trigger::SelectArea(self.name().to_string()))
    }
}

/// Image state of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailSlot {
    /// No image for this entry
    NotRequested,
    /// Waiting to be handed to a loader
    Pending,
    /// Handed to a loader, result not back yet
    Loading,
    Loaded(Thumbnail),
    /// Load failed; the entry renders without an image
    Missing,
}

impl ThumbnailSlot {
    fn initial(url: Option<&str>, size: Option<ThumbnailSize>) -> Self {
        match (url, size) {
            (Some(_), Some(_)) => ThumbnailSlot::Pending,
            _ => ThumbnailSlot::NotRequested,
        }
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        match self {
            ThumbnailSlot::Loaded(thumbnail) => Some(thumbnail),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, ThumbnailSlot::Pending | ThumbnailSlot::Loading)
    }

    pub(crate) fn resolve(&mut self, thumbnail: Option<Thumbnail>) {
        *self = match thumbnail {
            Some(thumbnail) => ThumbnailSlot::Loaded(thumbnail),
            None => ThumbnailSlot::Missing,
        };
    }
}

/// One placed entry
#[derive(Debug, Clone, PartialEq)]
pub struct ListCell {
    pub index: usize,
    pub cell: GridCell,
    pub label: String,
    pub thumbnail_url: Option<String>,
    pub thumbnail: ThumbnailSlot,
    pub trigger: Option<Trigger>,
}

/// A grid of entries ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    id: ViewId,
    placement: GridPlacement,
    cells: Vec<ListCell>,
    thumbnail_size: Option<ThumbnailSize>,
}

impl ListView {
    /// Place `items` on a grid of `columns`. Thumbnails are requested only
    /// when `thumbnail_size` is given.
    pub fn new<I: ListItem>(
        id: ViewId,
        items: &[I],
        columns: usize,
        thumbnail_size: Option<ThumbnailSize>,
    ) -> Self {
        let placement = plan(items.len(), columns);

        let cells = items
            .iter()
            .zip(placement.iter())
            .map(|(item, (index, cell))| {
                let url = item.thumbnail_url();
                ListCell {
                    index,
                    cell,
                    label: item.label().to_string(),
                    thumbnail_url: url.map(String::from),
                    thumbnail: ThumbnailSlot::initial(url, thumbnail_size),
                    trigger: item.trigger(),
                }
            })
            .collect();

        Self {
            id,
            placement,
            cells,
            thumbnail_size,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn placement(&self) -> &GridPlacement {
        &self.placement
    }

    pub fn cells(&self) -> &[ListCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn thumbnail_size(&self) -> Option<ThumbnailSize> {
        self.thumbnail_size
    }

    /// Cells grouped by grid row
    pub fn rows(&self) -> impl Iterator<Item = &[ListCell]> + '_ {
        self.cells.chunks(self.placement.columns())
    }

    /// Hand out every pending thumbnail as `(index, url)`, marking it loading
    pub fn take_pending(&mut self) -> Vec<(usize, String)> {
        self.cells
            .iter_mut()
            .filter(|c| c.thumbnail == ThumbnailSlot::Pending)
            .filter_map(|c| {
                let url = c.thumbnail_url.clone()?;
                c.thumbnail = ThumbnailSlot::Loading;
                Some((c.index, url))
            })
            .collect()
    }

    /// Record a finished thumbnail load; `None` marks the entry as missing
    pub fn set_thumbnail(&mut self, index: usize, thumbnail: Option<Thumbnail>) {
        match self.cells.get_mut(index) {
            Some(cell) if !cell.thumbnail.is_settled() => cell.thumbnail.resolve(thumbnail),
            Some(_) => tracing::trace!(index, "Ignoring thumbnail for settled entry"),
            None => tracing::debug!(index, "Thumbnail for unknown entry"),
        }
    }

    /// Load every pending thumbnail inline. Failures only affect their own entry.
    pub fn load_thumbnails<T: HttpTransport>(&mut self, loader: &ThumbnailLoader<T>) {
        let Some(size) = self.thumbnail_size else {
            return;
        };

        for (index, url) in self.take_pending() {
            let thumbnail = loader.load_or_none(&url, size);
            self.set_thumbnail(index, thumbnail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::thumbnail::test_support::png_bytes;
    use crate::transport::fake::FakeTransport;
    use crate::view_state::Tab;

    fn summaries(n: usize) -> Vec<MealSummary> {
        (0..n)
            .map(|i| MealSummary::new(format!("{i}"), format!("Meal {i}"), format!("https://img.test/{i}.png")))
            .collect()
    }

    #[test]
    fn test_failed_thumbnail_only_affects_its_entry() {
        let transport = FakeTransport::new();
        for i in [0, 1, 2, 4] {
            transport.respond(&format!("https://img.test/{i}.png"), png_bytes(8, 8));
        }
        transport.respond("https://img.test/3.png", b"garbage".to_vec());
        let loader = ThumbnailLoader::new(transport);

        let mut view = ListView::new(ViewId(1), &summaries(5), 1, Some(ThumbnailSize::square(50)));
        view.load_thumbnails(&loader);

        assert_eq!(view.len(), 5);
        for cell in view.cells() {
            if cell.index == 3 {
                assert_eq!(cell.thumbnail, ThumbnailSlot::Missing);
            } else {
                assert_eq!(cell.thumbnail.thumbnail().map(|t| t.width), Some(50));
            }
            assert_eq!(cell.label, format!("Meal {}", cell.index));
            assert!(cell.trigger.is_some());
        }
    }

    #[test]
    fn test_cells_follow_grid_plan() {
        let categories: Vec<_> = (0..13)
            .map(|i| CategoryRecord::new(format!("Cat {i}"), format!("c{i}.png")))
            .collect();

        let view = ListView::new(ViewId(2), &categories, 6, Some(ThumbnailSize::square(100)));
        let last = &view.cells()[12];
        assert_eq!((last.cell.row, last.cell.column), (2, 0));
        assert_eq!(view.rows().map(<[ListCell]>::len).collect::<Vec<_>>(), vec![6, 6, 1]);
        assert_eq!(last.trigger, Some(Trigger::ViewCategory("Cat 12".into())));
    }

    #[test]
    fn test_areas_have_no_thumbnails() {
        let areas = vec![AreaRecord::new("Greek"), AreaRecord::new("Thai")];
        let mut view = ListView::new(ViewId(3), &areas, 4, None);

        assert!(view.take_pending().is_empty());
        assert!(view.cells().iter().all(|c| c.thumbnail == ThumbnailSlot::NotRequested));
    }

    #[test]
    fn test_take_pending_marks_loading_once() {
        let mut view = ListView::new(ViewId(4), &summaries(2), 1, Some(ThumbnailSize::square(50)));

        let first = view.take_pending();
        assert_eq!(first.len(), 2);
        assert!(view.take_pending().is_empty());
        assert_eq!(view.cells()[0].thumbnail, ThumbnailSlot::Loading);

        view.set_thumbnail(1, None);
        assert_eq!(view.cells()[1].thumbnail, ThumbnailSlot::Missing);
    }

    #[test]
    fn test_missing_url_is_not_requested() {
        let items = vec![MealSummary::new("1", "Plain", "")];
        let transport = std::sync::Arc::new(FakeTransport::new());
        transport.fail("", TransportError::Status(400));
        let loader = ThumbnailLoader::new(transport.clone());

        let mut view = ListView::new(ViewId(5), &items, 1, Some(ThumbnailSize::square(50)));
        view.load_thumbnails(&loader);

        assert_eq!(view.cells()[0].thumbnail, ThumbnailSlot::NotRequested);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_trigger_into_action() {
        let origin = Owner::Tab(Tab::SearchByIngredient);
        assert_eq!(
            Trigger::OpenMeal("52772".into()).into_action(origin),
            Action::OpenMeal { id: "52772".into(), origin }
        );
        assert_eq!(
            Trigger::SelectArea("Thai".into()).into_action(origin),
            Action::SelectArea("Thai".into())
        );
    }
}
