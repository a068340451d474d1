//! The region hierarchy and the region resolver.
//!
//! Regions are stored in an arena: each [`RegionNode`] refers to its parent
//! and children by index into one `Vec`, never by pointer. Identifier
//! lookups go through a [`BTreeMap`] from [`RegionId`] to arena index.
//!
//! Resolution turns a set of region ids into a single search
//! [`Boundary`]. Multiple ids produce the *union* of their boundaries.
//! Unknown ids are reported back but are not an error: a request naming
//! only unknown regions simply resolves to an empty boundary and matches
//! no places.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use geo::{Area, MultiPolygon};
use lepton_geo::Boundary;
use lepton_types::RegionId;

use crate::error::CatalogError;

/// A named region with its boundary geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique region identifier.
    pub id: RegionId,
    /// Parent region, `None` for roots.
    pub parent_id: Option<RegionId>,
    /// Display name.
    pub name: String,
    /// Boundary as a (multi-)polygon in longitude/latitude degrees.
    pub boundary: MultiPolygon<f64>,
}

/// How region ids in a request are expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Only the listed regions' own boundaries.
    #[default]
    Exact,
    /// Each listed region plus all of its descendants.
    Subtree,
}

/// Returned when a region mode name is neither `exact` nor `subtree`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region mode '{0}'")]
pub struct UnknownRegionMode(pub String);

impl core::str::FromStr for ResolveMode {
    type Err = UnknownRegionMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "subtree" => Ok(Self::Subtree),
            other => Err(UnknownRegionMode(other.to_owned())),
        }
    }
}

/// The outcome of resolving a set of region ids.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Union of the resolved regions' boundaries.
    pub boundary: Boundary,
    /// Requested ids that exist, ascending.
    pub matched: Vec<RegionId>,
    /// Requested ids that do not exist, ascending.
    pub unknown: Vec<RegionId>,
}

#[derive(Debug, Clone)]
struct RegionNode {
    region: Region,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Planar area in square degrees, used only for diagnostic ordering.
    area: f64,
}

/// Immutable arena of regions linked into a forest by parent indices.
#[derive(Debug, Clone, Default)]
pub struct RegionTree {
    nodes: Vec<RegionNode>,
    by_id: BTreeMap<RegionId, usize>,
}

impl RegionTree {
    /// Build the arena and validate the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateRegion`] for repeated ids,
    /// [`CatalogError::UnknownParent`] for dangling parent links, and
    /// [`CatalogError::RegionCycle`] if the parent links are not acyclic.
    pub fn build(mut regions: Vec<Region>) -> Result<Self, CatalogError> {
        regions.sort_by_key(|r| r.id);

        let mut by_id = BTreeMap::new();
        for (idx, region) in regions.iter().enumerate() {
            if by_id.insert(region.id, idx).is_some() {
                return Err(CatalogError::DuplicateRegion(region.id));
            }
        }

        let mut nodes = Vec::with_capacity(regions.len());
        for region in regions {
            let parent = match region.parent_id {
                Some(parent_id) => Some(*by_id.get(&parent_id).ok_or(
                    CatalogError::UnknownParent {
                        region: region.id,
                        parent: parent_id,
                    },
                )?),
                None => None,
            };
            let area = region.boundary.unsigned_area();
            nodes.push(RegionNode {
                region,
                parent,
                children: Vec::new(),
                area,
            });
        }

        for idx in 0..nodes.len() {
            if let Some(parent) = nodes.get(idx).and_then(|n| n.parent)
                && let Some(parent_node) = nodes.get_mut(parent)
            {
                parent_node.children.push(idx);
            }
        }

        let tree = Self { nodes, by_id };
        tree.check_acyclic()?;
        Ok(tree)
    }

    /// Breadth-first walk from the roots; any node never reached sits on a
    /// cycle (every node has at most one parent).
    fn check_acyclic(&self) -> Result<(), CatalogError> {
        let mut visited = vec![false; self.nodes.len()];
        let mut queue: VecDeque<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(idx, _)| idx)
            .collect();

        while let Some(idx) = queue.pop_front() {
            if let Some(flag) = visited.get_mut(idx) {
                *flag = true;
            }
            if let Some(node) = self.nodes.get(idx) {
                queue.extend(node.children.iter().copied());
            }
        }

        match visited.iter().position(|seen| !seen) {
            Some(idx) => Err(CatalogError::RegionCycle(
                self.nodes.get(idx).map_or(RegionId(0), |n| n.region.id),
            )),
            None => Ok(()),
        }
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no region.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a region by id.
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.node(id).map(|n| &n.region)
    }

    fn node(&self, id: RegionId) -> Option<&RegionNode> {
        self.by_id.get(&id).and_then(|&idx| self.nodes.get(idx))
    }

    /// Direct children of a region, ascending by id.
    pub fn children(&self, id: RegionId) -> Vec<RegionId> {
        self.node(id).map_or_else(Vec::new, |node| {
            node.children
                .iter()
                .filter_map(|&c| self.nodes.get(c))
                .map(|c| c.region.id)
                .collect()
        })
    }

    /// Parent chain from the region's parent up to its root.
    pub fn ancestors(&self, id: RegionId) -> Vec<RegionId> {
        let mut chain = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(idx) = current {
            let Some(node) = self.nodes.get(idx) else {
                break;
            };
            chain.push(node.region.id);
            current = node.parent;
        }
        chain
    }

    /// Every region below `id`, breadth-first, excluding `id` itself.
    pub fn descendants(&self, id: RegionId) -> Vec<RegionId> {
        let Some(&start) = self.by_id.get(&id) else {
            return Vec::new();
        };
        self.subtree_indices(start)
            .into_iter()
            .skip(1)
            .filter_map(|idx| self.nodes.get(idx))
            .map(|n| n.region.id)
            .collect()
    }

    fn subtree_indices(&self, start: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            out.push(idx);
            if let Some(node) = self.nodes.get(idx) {
                queue.extend(node.children.iter().copied());
            }
        }
        out
    }

    /// Resolve a set of region ids into a search boundary.
    ///
    /// The boundary is the union of every resolved region's geometry. In
    /// [`ResolveMode::Subtree`] each region's descendants are added as
    /// well; a region reached twice contributes its polygons once.
    pub fn resolve(&self, ids: &BTreeSet<RegionId>, mode: ResolveMode) -> Resolution {
        let mut resolution = Resolution::default();
        let mut included = BTreeSet::new();

        for &id in ids {
            let Some(&idx) = self.by_id.get(&id) else {
                resolution.unknown.push(id);
                continue;
            };
            resolution.matched.push(id);

            let members = match mode {
                ResolveMode::Exact => vec![idx],
                ResolveMode::Subtree => self.subtree_indices(idx),
            };
            for member in members {
                if included.insert(member)
                    && let Some(node) = self.nodes.get(member)
                {
                    resolution.boundary.extend_multi(&node.region.boundary);
                }
            }
        }

        tracing::debug!(
            requested = ids.len(),
            matched = resolution.matched.len(),
            unknown = resolution.unknown.len(),
            polygons = resolution.boundary.polygon_count(),
            ?mode,
            "Resolved regions"
        );

        resolution
    }

    /// The `n` regions with the smallest area, ascending.
    ///
    /// Handy for picking narrow fixtures when probing a dataset.
    pub fn smallest(&self, n: usize) -> Vec<(RegionId, f64)> {
        let mut by_area: Vec<(RegionId, f64)> =
            self.nodes.iter().map(|n| (n.region.id, n.area)).collect();
        by_area.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        by_area.truncate(n);
        by_area
    }
}
