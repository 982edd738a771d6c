//! Scene arena: owns every object, hands out copyable handles.
//!
//! Cameras queue handles instead of owning objects, so scene lifetime is
//! managed in exactly one place. The arena is append-only; handles never
//! dangle within their own scene.

use crate::object::SceneObject;

/// Index handle into a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(usize);

/// Owner of all scene objects.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: SceneObject) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle(self.objects.len() - 1)
    }

    /// `None` for a handle from a different (larger) scene.
    pub fn get(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut SceneObject> {
        self.objects.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectHandle, &SceneObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectHandle(i), o))
    }
}
